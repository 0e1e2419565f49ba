//! Job server functions.

use dioxus::prelude::*;
use tracker_core::{Job, JobState, StateHistoryEntry};

#[cfg(feature = "server")]
async fn ready() -> Result<(), ServerFnError> {
    crate::ensure_initialized()
        .await
        .map(|_| ())
        .map_err(|e| ServerFnError::new(format!("Initialization failed: {}", e)))
}

#[cfg(feature = "server")]
fn db_error(e: db::DbError) -> ServerFnError {
    match e {
        db::DbError::NotFound(_) => ServerFnError::new("Job not found"),
        other => ServerFnError::new(format!("Database error: {}", other)),
    }
}

/// List jobs, newest first, optionally limited to a recency window
/// (`12h`, `24h`, `48h`, `7d`).
#[get("/api/v1/jobs?range")]
pub async fn list_jobs(range: Option<String>) -> Result<Vec<Job>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::JobRepository;
        use tracker_core::RecencyWindow;

        ready().await?;

        let window = match range.as_deref().unwrap_or_default().parse::<RecencyWindow>() {
            Ok(window) => window,
            Err(e) => {
                tracing::warn!("Listing all jobs: {}", e);
                RecencyWindow::All
            }
        };

        JobRepository::list(window.cutoff(chrono::Utc::now()))
            .await
            .map_err(db_error)
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = range;
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Get a job by ID; `None` when it does not exist.
#[get("/api/v1/jobs/:id")]
pub async fn get_job(id: String) -> Result<Option<Job>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::JobRepository;

        ready().await?;

        match JobRepository::get(&id.into()).await {
            Ok(job) => Ok(Some(job)),
            Err(db::DbError::NotFound(_)) => Ok(None),
            Err(e) => Err(db_error(e)),
        }
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = id;
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Move a job to another stage.
#[post("/api/v1/jobs/:id/state")]
pub async fn set_job_state(id: String, state: JobState) -> Result<Job, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::JobRepository;

        ready().await?;

        tracing::info!("Moving job {} to {}", id, state);
        JobRepository::set_state(&id.into(), state)
            .await
            .map_err(db_error)
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (id, state);
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Replace a job's notes.
#[patch("/api/v1/jobs/:id/notes")]
pub async fn set_job_notes(id: String, notes: String) -> Result<Job, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::JobRepository;

        ready().await?;

        tracing::info!("Updating notes for job {}", id);
        JobRepository::set_notes(&id.into(), &notes)
            .await
            .map_err(db_error)
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (id, notes);
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Recorded stage and notes changes of a job, oldest first.
#[get("/api/v1/jobs/:id/history")]
pub async fn job_history(id: String) -> Result<Vec<StateHistoryEntry>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::JobRepository;

        ready().await?;

        JobRepository::history(&id.into()).await.map_err(db_error)
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = id;
        Err(ServerFnError::new("Server-only function"))
    }
}
