//! Stored case endpoints
//!
//! GET and DELETE share the `/api/siren/db/:key` path: the key is a
//! department for GET and a case id for DELETE.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use siren_common::IncidentRecord;

use crate::{error::ApiResult, AppState};

/// GET /api/siren/db/{department}
///
/// Cases for the department ordered by time ascending; unknown departments
/// yield an empty array.
pub async fn list_cases(
    State(state): State<AppState>,
    Path(department): Path<String>,
) -> ApiResult<Json<Vec<IncidentRecord>>> {
    let cases = state.query.list_by_department(&department).await?;

    tracing::debug!(department = %department, count = cases.len(), "Cases listed");

    Ok(Json(cases))
}

/// DELETE /api/siren/db/{id}
///
/// 200 with an empty body whether or not the case existed.
pub async fn delete_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.query.delete_by_id(&id).await?;

    tracing::info!(case_id = %id, "Case deleted");

    Ok(StatusCode::OK)
}

/// POST /api/siren/db
///
/// Stores a JSON case as given and returns it with its id.
pub async fn create_case(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<IncidentRecord>> {
    let saved = state.bridge.ingest_slice(&body).await?;

    Ok(Json(saved))
}

/// Build case routes
pub fn case_routes() -> Router<AppState> {
    Router::new()
        .route("/api/siren/db", post(create_case))
        .route("/api/siren/db/:key", get(list_cases).delete(delete_case))
}
