//! # Pawsit API Server
//!
//! Serves the marketplace HTTP API and runs the booking expiry sweeper in
//! the background.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://... JWT_SECRET=... cargo run -p pawsit-api
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use pawsit_api::{
    app::{build_router, AppState},
    config::Config,
};
use pawsit_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, connect_with_retry},
    },
    services::Services,
};
use pawsit_worker::sweeper::{ExpirySweeper, SweeperConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str =
    "pawsit_api=debug,pawsit_shared=info,pawsit_worker=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("Pawsit API Server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = connect_with_retry(&config.database).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    let services = Services::postgres(pool.clone(), &config.jwt.secret);

    // One token stops both the server and the sweeper
    let shutdown = CancellationToken::new();

    let sweeper = ExpirySweeper::new(
        services.bookings.clone(),
        SweeperConfig {
            interval_secs: config.sweep_interval_secs,
        },
    )
    .with_shutdown_token(shutdown.child_token());
    let sweeper_handle = tokio::spawn(async move { sweeper.run().await });

    let bind_address = config.bind_address();
    let grace = Duration::from_secs(config.api.shutdown_grace_secs);
    let app = build_router(AppState::new(services, config, Some(pool.clone())));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %bind_address, "Server listening");

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.clone().cancelled_owned());
    let mut server_handle = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server_handle => {
            tracing::error!("Server stopped unexpectedly");
            result??;
        }
        _ = shutdown_signal() => {
            tracing::info!(
                grace_secs = grace.as_secs(),
                "Shutdown signal received, draining connections"
            );
            shutdown.cancel();

            match tokio::time::timeout(grace, &mut server_handle).await {
                Ok(result) => result??,
                Err(_) => {
                    tracing::warn!("Grace period elapsed, aborting open connections");
                    server_handle.abort();
                }
            }
        }
    }

    shutdown.cancel();
    if let Err(e) = sweeper_handle.await {
        tracing::error!(error = %e, "Expiry sweeper task failed");
    }

    close_pool(pool).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// JSON output when `LOG_FORMAT=json`
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
