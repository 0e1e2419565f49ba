//! Audit trail of pipeline changes for a job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{JobId, JobState};

/// One recorded stage or notes change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateHistoryEntry {
    pub job_id: JobId,
    /// Stage of the job after the change.
    pub state: JobState,
    #[serde(default)]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}
