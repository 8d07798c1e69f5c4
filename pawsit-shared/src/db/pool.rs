/// Database connection pool management
///
/// Builds the shared `PgPool`, verifies it with a health check and retries
/// the initial connection with a fixed backoff so the API can start while the
/// database container is still coming up.
///
/// # Example
///
/// ```no_run
/// use pawsit_shared::db::pool::{connect_with_retry, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = connect_with_retry(&config).await?;
///     Ok(())
/// }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the database connection pool
///
/// Timeouts are in seconds so they map directly onto environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    pub max_connections: u32,

    /// Idle connections kept warm
    pub min_connections: u32,

    /// Timeout for acquiring a connection from the pool
    pub acquire_timeout_seconds: u64,

    /// Idle connections are closed after this long (None = never)
    pub idle_timeout_seconds: Option<u64>,

    /// Connections are recycled after this long (None = never)
    pub max_lifetime_seconds: Option<u64>,

    /// Attempts made by [`connect_with_retry`] before giving up
    pub connect_retries: u32,

    /// Fixed delay between connection attempts
    pub retry_delay_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
            connect_retries: 5,
            retry_delay_seconds: 2,
        }
    }
}

/// Creates a pool and runs a health check
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database is unreachable or
/// the health check fails.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout_seconds = config.acquire_timeout_seconds,
        "Creating database connection pool"
    );

    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));

    if let Some(idle_timeout) = config.idle_timeout_seconds {
        pool_options = pool_options.idle_timeout(Duration::from_secs(idle_timeout));
        debug!(idle_timeout_seconds = idle_timeout, "Set idle timeout");
    }

    if let Some(max_lifetime) = config.max_lifetime_seconds {
        pool_options = pool_options.max_lifetime(Duration::from_secs(max_lifetime));
        debug!(max_lifetime_seconds = max_lifetime, "Set max lifetime");
    }

    let pool = pool_options.connect(&config.url).await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Creates the pool, retrying up to `connect_retries` times
///
/// Waits `retry_delay_seconds` between attempts and returns the last error
/// once all attempts fail.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let attempts = config.connect_retries.max(1);
    let delay = Duration::from_secs(config.retry_delay_seconds);
    let mut attempt = 1;

    loop {
        match create_pool(config).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < attempts => {
                warn!(
                    attempt = attempt,
                    max_attempts = attempts,
                    error = %e,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Executes `SELECT 1` to verify the database is reachable
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Gracefully closes the connection pool
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout_seconds, 30);
        assert_eq!(config.connect_retries, 5);
        assert_eq!(config.retry_delay_seconds, 2);
    }

    #[tokio::test]
    async fn test_connect_with_retry_gives_up() {
        let config = DatabaseConfig {
            url: "not-a-postgres-url".to_string(),
            connect_retries: 2,
            retry_delay_seconds: 0,
            ..Default::default()
        };

        assert!(connect_with_retry(&config).await.is_err());
    }
}
