//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are applied with the
//! sqlx migrator. They are never run automatically at server startup.

use super::CommandError;

/// Run pending migrations against the SwiftCart database.
///
/// # Errors
///
/// Returns `CommandError` if the environment is incomplete, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
