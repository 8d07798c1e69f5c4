/// Configuration management for the API server
///
/// Configuration comes from environment variables, with a `.env` file loaded
/// first when present.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS` / `DATABASE_MIN_CONNECTIONS`: pool bounds (10 / 2)
/// - `DATABASE_CONNECT_RETRIES` / `DATABASE_RETRY_DELAY_SECS`: startup retry (5 / 2)
/// - `API_HOST` / `API_PORT`: bind address (0.0.0.0 / 8080)
/// - `JWT_SECRET`: HMAC secret, at least 32 characters (required)
/// - `CORS_ORIGINS`: comma separated origins, `*` for any (default `*`)
/// - `PRODUCTION`: enables HSTS (default false)
/// - `RATE_LIMIT_PER_SECOND` / `RATE_LIMIT_BURST`: token bucket (1 / 5)
/// - `SHUTDOWN_GRACE_SECS`: in-flight request grace period (30)
/// - `EXPIRY_SWEEP_INTERVAL_SECS`: stale booking sweep period (3600)
/// - `RUN_MIGRATIONS`: apply migrations at startup (true)
///
/// # Example
///
/// ```no_run
/// use pawsit_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use pawsit_shared::db::pool::DatabaseConfig;
use std::env;
use std::str::FromStr;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,

    pub database: DatabaseConfig,

    pub jwt: JwtConfig,

    pub rate_limit: RateLimitConfig,

    /// Seconds between booking expiry sweeps
    pub sweep_interval_secs: u64,

    /// Apply pending migrations before serving
    pub run_migrations: bool,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,

    /// Grace period for in-flight requests on shutdown
    pub shutdown_grace_secs: u64,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// Per-client token bucket settings
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Tokens added per second
    pub per_second: f64,

    /// Bucket capacity
    pub burst: u32,

    /// Idle buckets older than this are evicted
    pub idle_ttl_secs: u64,

    /// Maximum number of tracked clients
    pub max_clients: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 1.0,
            burst: 5,
            idle_ttl_secs: 600,
            max_clients: 10_000,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value does not
    /// parse, or `JWT_SECRET` is shorter than 32 characters.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_defaults = DatabaseConfig::default();
        let rate_defaults = RateLimitConfig::default();

        Ok(Self {
            api: ApiConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_or("API_PORT", 8080)?,
                cors_origins,
                production: env_or("PRODUCTION", false)?,
                shutdown_grace_secs: env_or("SHUTDOWN_GRACE_SECS", 30)?,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: env_or(
                    "DATABASE_MAX_CONNECTIONS",
                    database_defaults.max_connections,
                )?,
                min_connections: env_or(
                    "DATABASE_MIN_CONNECTIONS",
                    database_defaults.min_connections,
                )?,
                connect_retries: env_or(
                    "DATABASE_CONNECT_RETRIES",
                    database_defaults.connect_retries,
                )?,
                retry_delay_seconds: env_or(
                    "DATABASE_RETRY_DELAY_SECS",
                    database_defaults.retry_delay_seconds,
                )?,
                ..database_defaults
            },
            jwt: JwtConfig { secret: jwt_secret },
            rate_limit: RateLimitConfig {
                per_second: env_or("RATE_LIMIT_PER_SECOND", rate_defaults.per_second)?,
                burst: env_or("RATE_LIMIT_BURST", rate_defaults.burst)?,
                ..rate_defaults
            },
            sweep_interval_secs: env_or("EXPIRY_SWEEP_INTERVAL_SECS", 3600)?,
            run_migrations: env_or("RUN_MIGRATIONS", true)?,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Parses `name` when set, otherwise returns `default`
fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}
