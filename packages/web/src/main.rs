// Dioxus `rsx!` macro expands to unwraps internally; allow to avoid false positives.
#![allow(clippy::disallowed_methods)]

use dioxus::prelude::*;

use tracker_core::JobId;
use ui::{JobPage, KanbanBoard, SyncProvider};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(BoardLayout)]
        #[route("/")]
        Board {},
        #[route("/job/:id")]
        JobDetail { id: String },
}

const BOARD_CSS: Asset = asset!("/assets/board.css");

fn main() {
    #[cfg(feature = "server")]
    {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();

        let config = api::ServerConfig::from_env();
        tracing::info!("Job store endpoint: {}", config.db.endpoint);
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Job Board" }
        document::Link { rel: "stylesheet", href: BOARD_CSS }

        SyncProvider {
            Router::<Route> {}
        }
    }
}

/// Shared page chrome around every route.
#[component]
fn BoardLayout() -> Element {
    rsx! {
        div { class: "app-layout",
            header { class: "app-header",
                Link { to: Route::Board {}, class: "app-title", "Job Board" }
            }
            main { class: "app-main",
                Outlet::<Route> {}
            }
        }
    }
}

/// Board page.
#[component]
fn Board() -> Element {
    let nav = use_navigator();

    rsx! {
        KanbanBoard {
            on_open: move |id: JobId| {
                nav.push(Route::JobDetail { id: id.to_string() });
            },
        }
    }
}

/// Job detail page, remounted per job so its queries follow the id.
#[component]
fn JobDetail(id: String) -> Element {
    rsx! {
        JobPage { key: "{id}", id: id.clone() }
    }
}
