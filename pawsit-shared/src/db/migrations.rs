/// Schema migrations
///
/// The SQL files in `migrations/` at the workspace root are embedded at
/// compile time; `run_migrations` applies whatever the database is missing
/// and reports where the schema ended up.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPool;
use tracing::{error, info};

static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Schema version as recorded in `_sqlx_migrations`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied_migrations: usize,

    /// `None` before the first migration ran
    pub latest_version: Option<i64>,
}

impl MigrationStatus {
    /// True when every embedded migration has been applied
    pub fn is_current(&self) -> bool {
        self.latest_version == MIGRATOR.iter().map(|m| m.version).max()
    }
}

/// Applies pending migrations and returns the resulting status
pub async fn run_migrations(pool: &PgPool) -> Result<MigrationStatus, MigrateError> {
    let embedded = MIGRATOR.iter().count();
    info!(embedded, "Applying database migrations");

    if let Err(e) = MIGRATOR.run(pool).await {
        error!(error = %e, "Migration failed");
        return Err(e);
    }

    let status = get_migration_status(pool).await?;
    info!(
        applied = status.applied_migrations,
        version = ?status.latest_version,
        "Database schema is up to date"
    );

    Ok(status)
}

/// Reads the applied migrations without changing anything
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let tracked: Option<String> =
        sqlx::query_scalar("SELECT to_regclass('public._sqlx_migrations')::text")
            .fetch_one(pool)
            .await?;

    if tracked.is_none() {
        return Ok(MigrationStatus {
            applied_migrations: 0,
            latest_version: None,
        });
    }

    let (applied, latest_version): (i64, Option<i64>) =
        sqlx::query_as("SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success")
            .fetch_one(pool)
            .await?;

    Ok(MigrationStatus {
        applied_migrations: usize::try_from(applied).unwrap_or_default(),
        latest_version,
    })
}
