//! Database schema definitions using SurrealQL.

use crate::{DbError, get_db};

/// Initialize the database schema.
///
/// This creates all necessary tables, fields, and indexes.
pub async fn init_schema() -> Result<(), DbError> {
    let db = get_db()?;

    tracing::info!("Initializing database schema...");

    db.query(JOB_SCHEMA).await?.check()?;
    db.query(STATE_HISTORY_SCHEMA).await?.check()?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Job table schema.
///
/// Timestamps are fixed-width UTC RFC 3339 strings, so string comparison
/// orders them chronologically.
const JOB_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS job SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS title ON job TYPE string DEFAULT "";
DEFINE FIELD IF NOT EXISTS company ON job TYPE string DEFAULT "";
DEFINE FIELD IF NOT EXISTS url ON job TYPE string DEFAULT "";
DEFINE FIELD IF NOT EXISTS description ON job TYPE option<string>;
DEFINE FIELD IF NOT EXISTS long_description ON job TYPE option<string>;
DEFINE FIELD IF NOT EXISTS full_description ON job TYPE option<string>;
DEFINE FIELD IF NOT EXISTS content ON job TYPE option<string>;
DEFINE FIELD IF NOT EXISTS country ON job TYPE option<string>;
DEFINE FIELD IF NOT EXISTS notes ON job TYPE option<string>;
DEFINE FIELD IF NOT EXISTS state ON job TYPE string DEFAULT "new";
DEFINE FIELD IF NOT EXISTS updated_at ON job TYPE option<string>;

DEFINE INDEX IF NOT EXISTS job_state ON job FIELDS state;
DEFINE INDEX IF NOT EXISTS job_updated ON job FIELDS updated_at;
"#;

/// Stage history, one row per state or notes change.
const STATE_HISTORY_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS job_state_history SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS job_id ON job_state_history TYPE string;
DEFINE FIELD IF NOT EXISTS state ON job_state_history TYPE string;
DEFINE FIELD IF NOT EXISTS notes ON job_state_history TYPE option<string>;
DEFINE FIELD IF NOT EXISTS timestamp ON job_state_history TYPE string;

DEFINE INDEX IF NOT EXISTS history_job ON job_state_history FIELDS job_id;
"#;
