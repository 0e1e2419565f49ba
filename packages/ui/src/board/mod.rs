//! Kanban board components.

mod credits_footer;
mod job_card;
mod kanban_board;
mod kanban_column;
mod range_select;
mod stage_badge;

pub use credits_footer::CreditsFooter;
pub use job_card::JobCard;
pub use kanban_board::KanbanBoard;
pub use kanban_column::KanbanColumn;
pub use range_select::RangeSelect;
pub use stage_badge::StageBadge;
