//! One stage column of the board and its drop target.

use dioxus::prelude::*;
use tracker_core::{BoardColumn, JobId, JobState, RecencyWindow, StageChange, resolve_drop};

use super::{JobCard, RangeSelect};

/// Props for KanbanColumn component.
#[derive(Props, Clone, PartialEq)]
pub struct KanbanColumnProps {
    pub column: BoardColumn,
    pub dragging: Signal<Option<JobId>>,
    /// Recency window; the inbox column hosts its selector.
    pub window: Signal<RecencyWindow>,
    /// Callback when a card is dropped onto this column.
    pub on_drop: EventHandler<StageChange>,
    pub on_open: EventHandler<JobId>,
}

#[component]
pub fn KanbanColumn(props: KanbanColumnProps) -> Element {
    let stage = props.column.stage;
    let count = props.column.count();
    let mut dragging = props.dragging;

    rsx! {
        section {
            class: "kanban-column",
            "data-stage": "{stage}",
            ondragover: move |event| event.prevent_default(),
            ondrop: move |event| {
                event.prevent_default();
                let dropped = dragging.write().take();
                if let Some(change) = dropped.and_then(|id| resolve_drop(&id, Some(stage.as_str()))) {
                    props.on_drop.call(change);
                }
            },

            header { class: "column-header",
                h3 { class: "column-title", {stage.label().to_uppercase()} }
                span { class: "column-count", "{count}" }
                if stage == JobState::New {
                    RangeSelect { window: props.window }
                }
            }

            div { class: "column-cards",
                if props.column.jobs.is_empty() {
                    p { class: "hint", "No jobs" }
                }
                for job in props.column.jobs.iter() {
                    JobCard {
                        key: "{job.id}",
                        job: job.clone(),
                        dragging: props.dragging,
                        on_open: props.on_open,
                    }
                }
            }
        }
    }
}
