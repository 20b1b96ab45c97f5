//! siren library - incident intake and query service
//!
//! Free-text emergency reports are normalized into incident records by an
//! external generative-AI oracle, stored, and served back per department.

pub mod api;
pub mod db;
pub mod error;
pub mod oracle;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::CaseStore;
use crate::oracle::ExtractionOracle;
use crate::services::{CaseBridge, NormalizationPipeline, QueryService};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Free text → stored record
    pub pipeline: Arc<NormalizationPipeline>,
    /// JSON payload → stored record
    pub bridge: CaseBridge,
    /// Listing and deletion
    pub query: QueryService,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Wire services around one store and one oracle
    pub fn new(store: Arc<dyn CaseStore>, oracle: Arc<dyn ExtractionOracle>) -> Self {
        let bridge = CaseBridge::new(store.clone());

        Self {
            pipeline: Arc::new(NormalizationPipeline::new(oracle, bridge.clone())),
            bridge,
            query: QueryService::new(store),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Any origin may call the API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::intake_routes())
        .merge(api::case_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
