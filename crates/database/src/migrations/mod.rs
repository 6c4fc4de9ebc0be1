//! Schema migrations
//!
//! Versioned SQL files live in `src/migrations/sql` and are applied with
//! refinery at startup, before any repository touches the pool.

use std::path::PathBuf;

use anyhow::{Context, Result};
use refinery::load_sql_migrations;
use tracing::info;

use crate::pool::DbPool;

/// Directory holding the versioned SQL files, anchored to this crate
fn sql_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/migrations/sql")
}

/// Apply any pending schema migrations
pub async fn run(pool: &DbPool) -> Result<()> {
    let mut client = pool
        .get()
        .await
        .context("Failed to get a connection for schema migrations")?;

    let dir = sql_dir();
    let migrations = load_sql_migrations(&dir)
        .with_context(|| format!("Failed to load migration files from {}", dir.display()))?;

    let report = refinery::Runner::new(&migrations)
        .run_async(&mut **client)
        .await
        .context("Schema migration failed")?;

    for migration in report.applied_migrations() {
        info!("Applied migration: {}", migration.name());
    }

    info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_files_resolve_from_the_crate() {
        let migrations = load_sql_migrations(sql_dir()).unwrap();
        assert!(!migrations.is_empty());
        assert!(migrations
            .iter()
            .any(|m| m.to_string().contains("initial_schema")));
    }
}
