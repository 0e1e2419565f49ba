//! SurrealDB persistence for the job board.
//!
//! Jobs and their stage history live in two tables. The connection is a
//! process-wide handle set up once by [`init`].
//!
//! # Features
//!
//! - `memory` (default): Use in-memory storage for testing
//! - `rocksdb`: Use RocksDB for persistent file-based storage

mod connection;
mod schema;
pub mod repositories;

pub use connection::{DbConfig, DbError, MEMORY_ENDPOINT, RootCredentials, get_db, init_db};
pub use schema::init_schema;

/// Initialize the database with the given configuration.
///
/// This should be called once at application startup.
pub async fn init(config: DbConfig) -> Result<(), DbError> {
    init_db(config).await?;
    init_schema().await?;
    Ok(())
}
