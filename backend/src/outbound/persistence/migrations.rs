//! Embedded schema migrations.
//!
//! Migrations are compiled into the binary and applied at startup, so a
//! fresh database needs no external tooling. The harness runs on a plain
//! synchronous connection; startup is the only caller.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

pub(crate) const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
#[error("failed to apply migrations: {message}")]
pub struct MigrationError {
    message: String,
}

/// Apply all pending migrations against the given database.
///
/// # Errors
///
/// Returns [`MigrationError`] when the connection cannot be established or
/// a migration fails; the database is left at the last fully-applied
/// migration.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| MigrationError {
        message: err.to_string(),
    })?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError {
            message: err.to_string(),
        })?;

    for migration in &applied {
        info!(migration = %migration, "applied migration");
    }

    Ok(())
}
