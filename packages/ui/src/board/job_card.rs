//! Draggable job card.

use dioxus::prelude::*;
use tracker_core::{DragGuard, Job, JobId};

/// Props for JobCard component.
#[derive(Props, Clone, PartialEq)]
pub struct JobCardProps {
    /// The job to display.
    pub job: Job,
    /// Id of the card currently being dragged, shared by the whole board.
    pub dragging: Signal<Option<JobId>>,
    /// Callback when the card is clicked without dragging.
    pub on_open: EventHandler<JobId>,
}

/// Card showing a job's flag, title, company and notes preview.
#[component]
pub fn JobCard(props: JobCardProps) -> Element {
    let job = props.job.clone();
    let mut dragging = props.dragging;
    let mut guard = use_signal(DragGuard::default);

    let is_dragging = dragging.read().as_ref() == Some(&job.id);
    let class = if is_dragging { "job-card dragging" } else { "job-card" };

    let id_for_drag = job.id.clone();
    let id_for_open = job.id.clone();

    rsx! {
        div {
            class: "{class}",
            draggable: "true",
            onmousedown: move |_| guard.write().press(),
            onmousemove: move |_| guard.write().pointer_moved(),
            ondragstart: move |_| {
                guard.write().pointer_moved();
                dragging.set(Some(id_for_drag.clone()));
            },
            ondragend: move |_| {
                guard.write().release();
                dragging.set(None);
            },
            onclick: move |_| {
                if guard.write().release() {
                    props.on_open.call(id_for_open.clone());
                }
            },

            div { class: "card-heading",
                if let Some(flag) = job.flag() {
                    span { class: "card-flag", "{flag}" }
                }
                span { class: "card-title", "{job.title}" }
            }
            div { class: "card-company", "{job.company}" }
            if let Some(notes) = job.notes_text() {
                div { class: "card-notes", "📝 {notes}" }
            }
        }
    }
}
