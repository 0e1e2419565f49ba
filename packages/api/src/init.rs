//! Server initialization for the job board.

use std::path::{Path, PathBuf};

use db::{DbConfig, DbError, repositories::JobRepository};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracker_core::Job;

/// SurrealDB endpoint, e.g. `mem://` or `rocksdb://./data/jobs`.
pub const DB_VAR: &str = "JOBBOARD_DB";
/// Optional root credentials for a remote SurrealDB.
pub const DB_USER_VAR: &str = "JOBBOARD_DB_USER";
pub const DB_PASS_VAR: &str = "JOBBOARD_DB_PASS";
/// JSON array of jobs upserted at startup.
pub const SEED_FILE_VAR: &str = "JOBBOARD_SEED_FILE";
/// Bearer token for the TheirStack billing endpoint.
pub const THEIRSTACK_KEY_VAR: &str = "THEIRSTACK_API_KEY";

static INIT: OnceCell<ServerConfig> = OnceCell::const_new();

/// Server settings read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub seed_file: Option<PathBuf>,
    pub theirstack_api_key: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut db = match var(DB_VAR) {
            Some(endpoint) => DbConfig::endpoint(endpoint),
            None => DbConfig::memory(),
        };
        if let (Some(user), Some(pass)) = (var(DB_USER_VAR), var(DB_PASS_VAR)) {
            db = db.with_credentials(user, pass);
        }

        Self {
            db,
            seed_file: var(SEED_FILE_VAR).map(PathBuf::from),
            theirstack_api_key: var(THEIRSTACK_KEY_VAR),
        }
    }
}

/// Initialization errors.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),
    #[error("Failed to read seed file {path}: {message}")]
    Seed { path: String, message: String },
}

/// Connect the database and load seed jobs, once per process.
///
/// Every server function calls this before touching the database.
pub async fn ensure_initialized() -> Result<&'static ServerConfig, InitError> {
    INIT.get_or_try_init(|| async {
        tracing::info!("Initializing job board server...");
        let config = ServerConfig::from_env();

        db::init(config.db.clone()).await?;

        if let Some(path) = &config.seed_file {
            let count = seed_jobs(path).await?;
            tracing::info!("Seeded {} jobs from {}", count, path.display());
        }

        if config.theirstack_api_key.is_none() {
            tracing::warn!("{} is not set; credit balance is unavailable", THEIRSTACK_KEY_VAR);
        }

        tracing::info!("Job board server initialized");
        Ok(config)
    })
    .await
}

async fn seed_jobs(path: &Path) -> Result<usize, InitError> {
    let seed_error = |message: String| InitError::Seed {
        path: path.display().to_string(),
        message,
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| seed_error(e.to_string()))?;
    let jobs = parse_seed(&raw).map_err(|e| seed_error(e.to_string()))?;

    for job in &jobs {
        JobRepository::upsert(job).await?;
    }
    Ok(jobs.len())
}

/// Seed files hold a JSON array of jobs; entries without an id are skipped.
fn parse_seed(raw: &str) -> Result<Vec<Job>, serde_json::Error> {
    let jobs: Vec<Job> = serde_json::from_str(raw)?;
    let total = jobs.len();
    let jobs: Vec<Job> = jobs
        .into_iter()
        .filter(|job| !job.id.as_str().is_empty())
        .collect();
    if jobs.len() < total {
        tracing::warn!("Skipped {} seed jobs without an id", total - jobs.len());
    }
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use db::RootCredentials;
    use tracker_core::JobState;

    #[test]
    fn defaults_to_in_memory_store() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.db.endpoint, db::MEMORY_ENDPOINT);
        assert!(config.db.credentials.is_none());
        assert!(config.seed_file.is_none());
        assert!(config.theirstack_api_key.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (DB_VAR, "rocksdb://./data/jobs"),
            (DB_USER_VAR, "root"),
            (DB_PASS_VAR, "secret"),
            (SEED_FILE_VAR, "jobs.json"),
            (THEIRSTACK_KEY_VAR, "  "),
        ]);
        let config = ServerConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.db.endpoint, "rocksdb://./data/jobs");
        assert_eq!(
            config.db.credentials,
            Some(RootCredentials {
                username: "root".to_string(),
                password: "secret".to_string(),
            })
        );
        assert_eq!(config.seed_file, Some(PathBuf::from("jobs.json")));
        assert!(config.theirstack_api_key.is_none(), "blank key counts as unset");
    }

    #[test]
    fn seed_entries_need_an_id() {
        let jobs = parse_seed(
            r#"[
                {"id": "a", "title": "Dev", "state": "saved"},
                {"title": "No id"},
                {"id": 7, "title": "Numeric"}
            ]"#,
        )
        .unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].stage(), JobState::Saved);
        assert_eq!(jobs[1].id.as_str(), "7");
    }
}
