//! Job detail page - a single posting with its stage actions and notes.

use dioxus::prelude::*;
use tracker_core::{JobId, JobState, StageChange};

use super::{HistoryList, NotesEditor};
use crate::board::StageBadge;
use crate::sync::{use_job, use_stage_mutation, use_sync};

/// Stage shortcuts offered on the detail page.
const ACTIONS: [(&str, JobState); 3] = [
    ("Save", JobState::Saved),
    ("Applied", JobState::Applied),
    ("Trash", JobState::Trash),
];

/// Props for JobPage.
#[derive(Props, Clone, PartialEq)]
pub struct JobPageProps {
    pub id: String,
}

/// Job detail page component.
#[component]
pub fn JobPage(props: JobPageProps) -> Element {
    let id = JobId::from(props.id.as_str());
    let job = use_job(id.clone());
    let stage = use_stage_mutation();
    let mut stage_error = stage.error;
    let sync = use_sync();

    let retry_id = id.clone();
    let retry = move |_| {
        let engine = sync.engine().clone();
        let id = retry_id.clone();
        spawn(async move {
            engine.refresh_job(&id).await;
        });
    };

    let state = job();

    rsx! {
        div { class: "page-container",
            // Breadcrumb
            nav { class: "breadcrumb",
                Link { to: "/", class: "breadcrumb-link", "Board" }
                span { class: "breadcrumb-separator", "/" }
                span { class: "breadcrumb-current", "{id}" }
            }

            if let Some(err) = stage_error() {
                div { class: "error-banner",
                    span { "{err}" }
                    button {
                        onclick: move |_| stage_error.set(None),
                        "×"
                    }
                }
            }

            if let Some(job) = state.data.as_ref() {
                div { class: "job-detail",
                    div { class: "page-header",
                        div { class: "page-header-content",
                            h1 { class: "page-title", "{job.title}" }
                            p { class: "page-description", "{job.company}" }
                        }
                        StageBadge { state: job.stage() }
                    }

                    div { class: "job-actions",
                        for (label, to) in ACTIONS {
                            {
                                let change = StageChange { id: job.id.clone(), to };
                                let current = job.stage() == to;
                                rsx! {
                                    button {
                                        key: "{to}",
                                        class: if current { "btn btn-action active" } else { "btn btn-action" },
                                        onclick: move |_| stage.commit.call(change.clone()),
                                        {label}
                                    }
                                }
                            }
                        }
                        if !job.url.is_empty() {
                            a {
                                class: "btn btn-link",
                                href: "{job.url}",
                                target: "_blank",
                                rel: "noopener noreferrer",
                                "Open Job Posting"
                            }
                        }
                    }

                    div { class: "job-description",
                        {job.description_text().unwrap_or("No description available.")}
                    }

                    NotesEditor {
                        job_id: job.id.clone(),
                        notes: job.notes.clone(),
                    }

                    HistoryList { job_id: job.id.clone() }
                }
            } else if let Some(err) = state.error.as_ref() {
                if err.is_not_found() {
                    div { class: "empty-state",
                        p { "Job not found" }
                        Link { to: "/", class: "hint", "Back to the board" }
                    }
                } else {
                    div { class: "error-panel",
                        p { "Failed to load job" }
                        p { class: "hint", "{err}" }
                        button { class: "btn", onclick: retry, "Retry" }
                    }
                }
            } else {
                div { class: "loading-state", "Loading job..." }
            }
        }
    }
}
