//! This crate contains all shared UI for the workspace.

// Dioxus `rsx!` macro expands to unwraps internally; allow to avoid false positives.
#![allow(clippy::disallowed_methods)]

pub mod board;
pub mod detail;
pub mod sync;

pub use board::KanbanBoard;
pub use detail::JobPage;
pub use sync::SyncProvider;
