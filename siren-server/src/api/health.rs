//! Liveness probe for load balancers and uptime monitors

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" while the process answers
    pub status: String,
    pub module: String,
    pub version: String,
    /// Whole seconds since `AppState` was built
    pub uptime_seconds: u64,
}

impl HealthResponse {
    fn since(started: DateTime<Utc>) -> Self {
        let elapsed = Utc::now().signed_duration_since(started).num_seconds();

        Self {
            status: "ok".to_string(),
            module: "siren".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: u64::try_from(elapsed).unwrap_or(0),
        }
    }
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::since(state.startup_time))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
