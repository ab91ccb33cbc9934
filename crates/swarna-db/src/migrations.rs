//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied in file-name order on every open:
//!
//! - `001_initial_schema.sql`: bookings, rates and their indexes
//! - `002_seed_rates.sql`: the villa's default rate card
//!
//! sqlx records each applied file in `_sqlx_migrations` and refuses to start
//! if an applied file was later edited, so schema changes always go in a new
//! numbered file.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever the file has not seen yet. A no-op on an up-to-date store.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (total, before) = migration_status(pool).await?;
    MIGRATOR.run(pool).await?;

    if before < total {
        info!(applied = total - before, total, "Schema migrated");
    }
    Ok(())
}

/// `(total, applied)`. A fresh file has no bookkeeping table yet and reports 0 applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = match sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
    {
        Ok(count) => count,
        Err(e) => {
            debug!(error = %e, "No migration bookkeeping yet");
            0
        }
    };

    Ok((total, usize::try_from(applied).unwrap_or(0)))
}
