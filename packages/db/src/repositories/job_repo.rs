//! Job repository: postings, their stage and notes, and the change history.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use tracker_core::{Job, JobId, JobState, StateHistoryEntry, parse_timestamp};

use crate::{DbError, get_db};

/// Repository for job persistence operations.
pub struct JobRepository;

/// Internal record type for SurrealDB.
///
/// The record key is the job id; timestamps are stored as strings.
#[derive(Debug, Serialize, Deserialize)]
struct JobRecord {
    #[serde(skip_serializing)]
    id: Option<Thing>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    long_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    full_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default)]
    state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

impl JobRecord {
    fn from_job(job: &Job) -> Self {
        Self {
            id: None,
            title: job.title.clone(),
            company: job.company.clone(),
            url: job.url.clone(),
            description: job.description.clone(),
            long_description: job.long_description.clone(),
            full_description: job.full_description.clone(),
            content: job.content.clone(),
            country: job.country.clone(),
            notes: job.notes.clone(),
            state: job.stage().as_str().to_string(),
            updated_at: job.updated_at.map(stored_timestamp),
        }
    }

    fn into_job(self) -> Job {
        let id = self
            .id
            .map(|thing| JobId::new(thing.id.to_raw()))
            .unwrap_or_default();
        Job {
            id,
            title: self.title,
            company: self.company,
            url: self.url,
            description: self.description,
            long_description: self.long_description,
            full_description: self.full_description,
            content: self.content,
            country: self.country,
            state: self.state.parse().ok(),
            notes: self.notes,
            updated_at: self.updated_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// Stage history record.
#[derive(Debug, Serialize, Deserialize)]
struct HistoryRecord {
    job_id: String,
    state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    timestamp: String,
}

impl HistoryRecord {
    fn into_entry(self) -> Option<StateHistoryEntry> {
        let Some(timestamp) = parse_timestamp(&self.timestamp) else {
            tracing::warn!(
                "Skipping history entry for job {} with bad timestamp {:?}",
                self.job_id,
                self.timestamp
            );
            return None;
        };
        Some(StateHistoryEntry {
            job_id: JobId::new(self.job_id),
            state: self.state.parse().unwrap_or_default(),
            notes: self.notes,
            timestamp,
        })
    }
}

/// Fixed-width UTC form used for every stored timestamp.
fn stored_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl JobRepository {
    /// Insert a job, or refresh the listing fields of a stored one.
    ///
    /// A stored job keeps its stage, notes and `updated_at`; those only
    /// change through [`set_state`](Self::set_state) and
    /// [`set_notes`](Self::set_notes).
    pub async fn upsert(job: &Job) -> Result<Job, DbError> {
        let db = get_db()?;
        let key = job.id.to_string();

        let existing: Option<JobRecord> = db.select(("job", key.clone())).await?;

        let mut record = JobRecord::from_job(job);
        match existing {
            Some(stored) => {
                record.state = stored.state;
                record.notes = stored.notes;
                record.updated_at = stored.updated_at;
            }
            None => {
                if record.updated_at.is_none() {
                    record.updated_at = Some(stored_timestamp(Utc::now()));
                }
            }
        }

        let saved: Option<JobRecord> = db.upsert(("job", key)).content(record).await?;

        saved
            .map(JobRecord::into_job)
            .ok_or_else(|| DbError::Query(format!("Failed to store job {}", job.id)))
    }

    /// Get a job by ID.
    pub async fn get(id: &JobId) -> Result<Job, DbError> {
        let db = get_db()?;

        let record: Option<JobRecord> = db.select(("job", id.to_string())).await?;

        record
            .map(JobRecord::into_job)
            .ok_or_else(|| DbError::NotFound(format!("Job not found: {}", id)))
    }

    /// List jobs, newest first, optionally only those updated at or after
    /// `cutoff`. Jobs without `updated_at` never match a cutoff.
    pub async fn list(cutoff: Option<DateTime<Utc>>) -> Result<Vec<Job>, DbError> {
        let db = get_db()?;

        let mut response = match cutoff {
            Some(cutoff) => {
                db.query("SELECT * FROM job WHERE updated_at >= $cutoff ORDER BY updated_at DESC")
                    .bind(("cutoff", stored_timestamp(cutoff)))
                    .await?
            }
            None => db.query("SELECT * FROM job ORDER BY updated_at DESC").await?,
        };

        let records: Vec<JobRecord> = response.take(0)?;

        Ok(records.into_iter().map(JobRecord::into_job).collect())
    }

    /// Move a job to another stage and record the change.
    pub async fn set_state(id: &JobId, state: JobState) -> Result<Job, DbError> {
        let db = get_db()?;
        let now = Utc::now();

        let record: Option<JobRecord> = db
            .update(("job", id.to_string()))
            .merge(serde_json::json!({
                "state": state.as_str(),
                "updated_at": stored_timestamp(now),
            }))
            .await?;

        let job = record
            .map(JobRecord::into_job)
            .ok_or_else(|| DbError::NotFound(format!("Job not found: {}", id)))?;

        Self::record_history(&job, None, now).await?;
        Ok(job)
    }

    /// Replace a job's notes and record the change with its current stage.
    pub async fn set_notes(id: &JobId, notes: &str) -> Result<Job, DbError> {
        let db = get_db()?;

        let record: Option<JobRecord> = db
            .update(("job", id.to_string()))
            .merge(serde_json::json!({ "notes": notes }))
            .await?;

        let job = record
            .map(JobRecord::into_job)
            .ok_or_else(|| DbError::NotFound(format!("Job not found: {}", id)))?;

        Self::record_history(&job, Some(notes), Utc::now()).await?;
        Ok(job)
    }

    /// Recorded changes of a job, oldest first.
    pub async fn history(id: &JobId) -> Result<Vec<StateHistoryEntry>, DbError> {
        let db = get_db()?;

        let mut response = db
            .query("SELECT * FROM job_state_history WHERE job_id = $job_id ORDER BY timestamp ASC")
            .bind(("job_id", id.to_string()))
            .await?;

        let records: Vec<HistoryRecord> = response.take(0)?;

        Ok(records
            .into_iter()
            .filter_map(HistoryRecord::into_entry)
            .collect())
    }

    /// Stage moves are recorded without notes; notes edits carry the new text.
    async fn record_history(job: &Job, notes: Option<&str>, at: DateTime<Utc>) -> Result<(), DbError> {
        let db = get_db()?;

        let history = HistoryRecord {
            job_id: job.id.to_string(),
            state: job.stage().as_str().to_string(),
            notes: notes.map(str::to_string),
            timestamp: stored_timestamp(at),
        };

        let _: Option<HistoryRecord> = db.create("job_state_history").content(history).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stored_timestamps_sort_chronologically() {
        let early = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let late = early + chrono::TimeDelta::milliseconds(1500);
        let (a, b) = (stored_timestamp(early), stored_timestamp(late));
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(parse_timestamp(&a), Some(early));
    }

    #[test]
    fn unknown_stored_state_is_left_unset() {
        let record = JobRecord {
            id: None,
            title: "Dev".into(),
            company: "Acme".into(),
            url: String::new(),
            description: None,
            long_description: None,
            full_description: None,
            content: None,
            country: None,
            notes: None,
            state: "archived".into(),
            updated_at: None,
        };
        let job = record.into_job();
        assert_eq!(job.state, None);
        assert_eq!(job.stage(), JobState::New);
    }
}
