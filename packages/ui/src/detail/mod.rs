//! Job detail page components.

mod history_list;
mod job_page;
mod notes_editor;

pub use history_list::HistoryList;
pub use job_page::JobPage;
pub use notes_editor::NotesEditor;
