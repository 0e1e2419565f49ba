//! The process-wide SurrealDB handle for the job store.

use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use thiserror::Error;
use tokio::sync::OnceCell;

/// In-memory engine endpoint, used when nothing else is configured.
pub const MEMORY_ENDPOINT: &str = "mem://";

static STORE: OnceCell<Surreal<Any>> = OnceCell::const_new();

/// Root login for a remote or secured engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootCredentials {
    pub username: String,
    pub password: String,
}

/// Where the job store lives.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// `mem://`, `rocksdb://<path>` or a remote engine URL.
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub credentials: Option<RootCredentials>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::endpoint(MEMORY_ENDPOINT)
    }
}

impl DbConfig {
    pub fn memory() -> Self {
        Self::default()
    }

    /// Job store at `endpoint`, in the `jobboard/main` namespace and database.
    pub fn endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            namespace: "jobboard".to_string(),
            database: "main".to_string(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(RootCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Job store not initialized")]
    NotInitialized,
    #[error("Connection error: {0}")]
    Connection(#[from] surrealdb::Error),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Open the job store.
///
/// Only the first call connects; later calls get that connection back and
/// their config is ignored.
pub async fn init_db(config: DbConfig) -> Result<&'static Surreal<Any>, DbError> {
    STORE
        .get_or_try_init(|| async {
            tracing::info!("Opening job store at {}", config.endpoint);
            let db = connect(&config.endpoint).await?;

            if let Some(login) = &config.credentials {
                db.signin(Root {
                    username: &login.username,
                    password: &login.password,
                })
                .await?;
            }

            db.use_ns(&config.namespace).use_db(&config.database).await?;
            tracing::info!("Job store ready: {}/{}", config.namespace, config.database);
            Ok(db)
        })
        .await
}

/// The open job store, or [`DbError::NotInitialized`] before [`init_db`].
pub fn get_db() -> Result<&'static Surreal<Any>, DbError> {
    STORE.get().ok_or(DbError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_uses_the_board_namespace() {
        let config = DbConfig::memory();
        assert_eq!(config.endpoint, MEMORY_ENDPOINT);
        assert_eq!(config.namespace, "jobboard");
        assert_eq!(config.database, "main");
        assert!(config.credentials.is_none());
    }

    #[test]
    fn credentials_are_attached_to_any_endpoint() {
        let config = DbConfig::endpoint("ws://db:8000").with_credentials("root", "secret");
        assert_eq!(config.endpoint, "ws://db:8000");
        assert_eq!(
            config.credentials,
            Some(RootCredentials {
                username: "root".to_string(),
                password: "secret".to_string(),
            })
        );
    }
}
