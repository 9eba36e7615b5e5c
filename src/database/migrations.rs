use error_stack::{Result, ResultExt};
use tokio::time::Instant;
use tracing::info;

use super::{Connection, MigrationError};

/// Everything the service persists lives in this one table.
const SETUP_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    flags    INTEGER NOT NULL DEFAULT 0
);
";

#[tracing::instrument(skip_all, name = "db.migrations.run_pending")]
pub async fn run_pending(conn: &mut Connection) -> Result<(), MigrationError> {
    let now = Instant::now();
    info!("Performing database migrations...");

    sqlx::query(SETUP_SCHEMA)
        .execute(conn)
        .await
        .change_context(MigrationError)?;

    let elapsed = now.elapsed();
    info!("Successfully performed database migrations! took {elapsed:.2?}");

    Ok(())
}
