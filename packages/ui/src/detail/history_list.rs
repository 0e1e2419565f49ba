//! Stage history of a job.

use dioxus::prelude::*;
use tracker_core::JobId;

use crate::board::StageBadge;
use crate::sync::use_job_history;

#[component]
pub fn HistoryList(job_id: JobId) -> Element {
    let history = use_job_history(job_id);
    let state = history();

    rsx! {
        div { class: "history-list",
            h3 { "History" }
            match state.data.as_ref() {
                Some(entries) if entries.is_empty() => rsx! {
                    p { class: "hint", "No changes recorded yet" }
                },
                Some(entries) => rsx! {
                    ul {
                        for entry in entries.iter() {
                            li { class: "history-entry",
                                span { class: "history-time",
                                    {entry.timestamp.format("%Y-%m-%d %H:%M UTC").to_string()}
                                }
                                StageBadge { state: entry.state }
                                if let Some(notes) = entry.notes.as_deref().filter(|n| !n.trim().is_empty()) {
                                    span { class: "history-notes", "{notes}" }
                                }
                            }
                        }
                    }
                },
                None if state.error.is_some() => rsx! {
                    p { class: "hint", "History unavailable" }
                },
                None => rsx! {
                    p { class: "hint", "Loading history..." }
                },
            }
        }
    }
}
