//! Recency window selector shown in the inbox column header.

use dioxus::prelude::*;
use tracker_core::RecencyWindow;

#[derive(Props, Clone, PartialEq)]
pub struct RangeSelectProps {
    /// Window driving the board's job collection.
    pub window: Signal<RecencyWindow>,
}

#[component]
pub fn RangeSelect(props: RangeSelectProps) -> Element {
    let mut window = props.window;
    let current = window();

    rsx! {
        select {
            class: "range-select",
            value: "{current.as_str()}",
            onchange: move |event| match event.value().parse::<RecencyWindow>() {
                Ok(selected) => window.set(selected),
                Err(e) => tracing::warn!("Ignoring recency window: {}", e),
            },
            for option_window in RecencyWindow::ALL {
                option {
                    value: "{option_window.as_str()}",
                    selected: option_window == current,
                    {option_window.label()}
                }
            }
        }
    }
}
