/// Liveness probe, public and outside `/api`
///
/// ```text
/// GET /health
///
/// {"status": "healthy", "version": "0.1.0", "database": "connected"}
/// ```
///
/// A failing database query degrades the status but still answers 200, so
/// the probe distinguishes a dead process from a dead dependency.

use crate::app::AppState;
use axum::{extract::State, Json};
use pawsit_shared::db::pool::health_check as ping_database;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseStatus {
    Connected,
    Disconnected,
    /// In-memory storage, no pool
    NotConfigured,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: Status,
    pub version: String,
    pub database: DatabaseStatus,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.db {
        None => DatabaseStatus::NotConfigured,
        Some(pool) => match ping_database(pool).await {
            Ok(()) => DatabaseStatus::Connected,
            Err(e) => {
                tracing::warn!(error = %e, "Database ping failed");
                DatabaseStatus::Disconnected
            }
        },
    };

    let status = match database {
        DatabaseStatus::Disconnected => Status::Degraded,
        _ => Status::Healthy,
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}
