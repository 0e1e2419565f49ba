//! Pipeline stage badge.

use dioxus::prelude::*;
use tracker_core::JobState;

/// Badge for displaying a job's stage.
#[component]
pub fn StageBadge(state: JobState) -> Element {
    let class = format!("badge-{}", state.as_str());

    rsx! {
        span {
            class: "stage-badge {class}",
            {state.label()}
        }
    }
}
