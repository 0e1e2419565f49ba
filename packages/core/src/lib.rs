//! Core domain types for the job board.
//!
//! This crate contains shared types used across all packages:
//! - Job, JobState and RecencyWindow for postings and their pipeline
//! - Board grouping and drag handling
//! - Notes drafts and the request cache used by the client

pub mod board;
pub mod cache;
mod credits;
mod drag;
mod history;
mod job;
mod notes;

pub use board::{BoardColumn, StageChange, group_by_stage, resolve_drop};
pub use cache::{FetchTicket, QueryCache, QueryState};
pub use credits::Credits;
pub use drag::DragGuard;
pub use history::StateHistoryEntry;
pub use job::{
    Job, JobId, JobState, ParseStateError, ParseWindowError, RecencyWindow, flag_for_country,
    parse_timestamp,
};
pub use notes::NotesDraft;
