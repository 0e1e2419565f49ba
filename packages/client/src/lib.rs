//! Client side of the job board API.
//!
//! - [`ApiClient`]: HTTP mapping of list/get/state/notes/credits
//! - [`ClientConfig`]: base URL resolution
//! - [`JobSync`]: cached, de-duplicated access shared by every view

mod config;
mod error;
mod http;
pub mod sync;

pub use config::{API_URL_VAR, ClientConfig, DEFAULT_API_PORT, origin_with_port};
pub use error::NetworkError;
pub use http::{ApiClient, JobsApi, parse_updated_job};
pub use sync::JobSync;

// Re-export core types for convenience
pub use tracker_core::{Credits, Job, JobId, JobState, RecencyWindow, StateHistoryEntry};
