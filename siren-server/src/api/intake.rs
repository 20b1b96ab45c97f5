//! Free-text report intake
//!
//! POST /api/chiron/audio-output with `{"text": "..."}`. The text is usually a
//! speech-to-text transcript of an emergency call.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde_json::Value;
use siren_common::IncidentRecord;

use crate::{
    error::{ApiError, ApiResult},
    services::PipelineError,
    AppState,
};

/// POST /api/chiron/audio-output
///
/// Returns the extracted (or fallback) fields. A body that is not JSON, or
/// whose `text` is absent, not a string, or blank, is rejected with 400.
pub async fn submit_text(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<IncidentRecord>> {
    let Some(text) = request_text(&body) else {
        return Err(ApiError::from(PipelineError::MissingText));
    };

    tracing::info!(text_length = text.len(), "Report received");

    let outcome = state.pipeline.extract_and_store(&text).await?;

    Ok(Json(outcome.record))
}

fn request_text(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("text")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_owned)
}

/// Build intake routes
pub fn intake_routes() -> Router<AppState> {
    Router::new().route("/api/chiron/audio-output", post(submit_text))
}
