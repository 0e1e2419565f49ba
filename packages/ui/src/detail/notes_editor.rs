//! Notes editor with unsaved-change tracking.

use dioxus::prelude::*;
use tracker_core::{JobId, NotesDraft};

use crate::sync::use_notes_mutation;

/// Props for NotesEditor component.
#[derive(Props, Clone, PartialEq)]
pub struct NotesEditorProps {
    pub job_id: JobId,
    /// Notes as last fetched from the server.
    pub notes: Option<String>,
}

/// Free-text notes for a job.
///
/// Typed text survives refetches until it is saved; a fresh server value
/// only replaces the text while there are no unsaved changes.
#[component]
pub fn NotesEditor(props: NotesEditorProps) -> Element {
    let notes = props.notes.clone();
    let mut draft = use_signal(|| NotesDraft::new(notes.as_deref()));
    let mutation = use_notes_mutation(props.job_id.clone(), draft);

    use_effect(use_reactive!(|notes| {
        draft.write().reseed(notes.as_deref());
    }));

    let dirty = draft.read().is_dirty();
    let text = draft.read().text().to_string();
    let saving = (mutation.saving)();

    rsx! {
        div { class: "notes-editor",
            div { class: "notes-header",
                h3 { "Notes" }
                if dirty {
                    span { class: "unsaved-indicator", "Unsaved changes" }
                }
            }

            if let Some(err) = (mutation.error)() {
                div { class: "error-message", "{err}" }
            }

            textarea {
                class: "notes-input",
                rows: "8",
                placeholder: "Recruiter contacts, interview dates, impressions...",
                value: "{text}",
                oninput: move |event| draft.write().edit(event.value()),
            }

            button {
                class: "btn btn-primary",
                disabled: !dirty,
                onclick: move |_| mutation.save.call(()),
                if saving { "Saving..." } else { "Save Notes" }
            }
        }
    }
}
