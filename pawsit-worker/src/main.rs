//! # Pawsit Worker
//!
//! Runs the booking expiry sweeper on its own, for deployments that keep it
//! out of the API process.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo run -p pawsit-worker
//! ```

use std::env;
use std::sync::Arc;

use pawsit_shared::db::pool::{close_pool, connect_with_retry, DatabaseConfig};
use pawsit_shared::repository::postgres::{
    PgBookingRepository, PgOfferingRepository, PgPetRepository, PgSitterRepository,
};
use pawsit_shared::services::BookingService;
use pawsit_worker::sweeper::{ExpirySweeper, SweeperConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pawsit_worker=info,pawsit_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Pawsit Worker v{} starting", env!("CARGO_PKG_VERSION"));

    let database = DatabaseConfig {
        url: env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
        max_connections: 2,
        min_connections: 1,
        ..Default::default()
    };
    let interval_secs = env::var("EXPIRY_SWEEP_INTERVAL_SECS")
        .unwrap_or_else(|_| "3600".to_string())
        .parse::<u64>()?;

    let pool = connect_with_retry(&database).await?;

    let bookings = BookingService::new(
        Arc::new(PgBookingRepository::new(pool.clone())),
        Arc::new(PgPetRepository::new(pool.clone())),
        Arc::new(PgOfferingRepository::new(pool.clone())),
        Arc::new(PgSitterRepository::new(pool.clone())),
    );
    let sweeper = ExpirySweeper::new(bookings, SweeperConfig { interval_secs });

    let shutdown = sweeper.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
        }
        shutdown.cancel();
    });

    sweeper.run().await;
    close_pool(pool).await;

    Ok(())
}
