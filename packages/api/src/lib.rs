//! Server API functions for the job board.
//!
//! This crate contains the fullstack server functions for:
//! - Jobs (list by recency, get, move between stages, notes, history)
//! - Status (remaining upstream API credits)

mod jobs;
mod status;

#[cfg(feature = "server")]
mod init;

// Re-export all server functions
pub use jobs::*;
pub use status::*;

#[cfg(feature = "server")]
pub use init::*;

// Re-export core types for convenience
pub use tracker_core::{Credits, Job, JobId, JobState, RecencyWindow, StateHistoryEntry};
