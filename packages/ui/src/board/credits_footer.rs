//! Footer with the remaining upstream API credits.

use dioxus::prelude::*;

use crate::sync::use_credits;

#[component]
pub fn CreditsFooter() -> Element {
    let credits = use_credits();
    let state = credits();

    let text = match (&state.data, &state.error) {
        (Some(credits), _) => format!("{} credits remaining", credits.remaining_credits),
        (None, Some(_)) => "API credits unavailable".to_string(),
        (None, None) => "Checking API credits...".to_string(),
    };

    rsx! {
        footer { class: "credits-footer", "{text}" }
    }
}
