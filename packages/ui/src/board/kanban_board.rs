//! The kanban board page.

use dioxus::prelude::*;
use tracker_core::{JobId, RecencyWindow, group_by_stage};

use super::{CreditsFooter, KanbanColumn};
use crate::sync::{use_job_collection, use_stage_mutation, use_sync};

/// Board of all tracked jobs, one column per stage.
///
/// Cards move between columns by drag and drop; a plain click opens the
/// job through `on_open`.
#[component]
pub fn KanbanBoard(on_open: EventHandler<JobId>) -> Element {
    let window = use_signal(RecencyWindow::default);
    let collection = use_job_collection(window);
    let stage = use_stage_mutation();
    let mut stage_error = stage.error;
    let dragging = use_signal(|| None::<JobId>);
    let sync = use_sync();

    let retry = move |_| {
        let engine = sync.engine().clone();
        let current = window();
        spawn(async move {
            engine.refresh_collection(current).await;
        });
    };

    let state = collection();

    rsx! {
        div { class: "board-page",
            // Error banner
            if let Some(err) = stage_error() {
                div { class: "error-banner",
                    span { "{err}" }
                    button {
                        onclick: move |_| stage_error.set(None),
                        "×"
                    }
                }
            }

            if let Some(jobs) = state.data.as_ref() {
                if let Some(err) = state.error.as_ref() {
                    div { class: "stale-notice", "Showing cached jobs: {err}" }
                }
                div { class: "kanban-board",
                    for column in group_by_stage(jobs) {
                        KanbanColumn {
                            key: "{column.stage}",
                            column: column.clone(),
                            dragging,
                            window,
                            on_drop: move |change| stage.commit.call(change),
                            on_open,
                        }
                    }
                }
            } else if let Some(err) = state.error.as_ref() {
                div { class: "error-panel",
                    p { "Failed to load jobs" }
                    p { class: "hint", "{err}" }
                    button { class: "btn", onclick: retry, "Retry" }
                }
            } else {
                div { class: "loading-state", "Loading jobs..." }
            }

            CreditsFooter {}
        }
    }
}
