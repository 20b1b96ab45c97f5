//! Gemini client
//!
//! Calls the `generateContent` endpoint with a single text part and returns
//! the first candidate's first text part.
//!
//! # API Reference
//! - Endpoint: https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent
//! - Auth: `x-goog-api-key` header
//!
//! When JSON response mode is on, the request sets
//! `generationConfig.responseMimeType = "application/json"` so the model
//! answers with a bare JSON document instead of a fenced markdown block.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use siren_common::config::OracleSettings;
use tracing::debug;

use super::{ExtractionOracle, OracleError};

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini `generateContent` client
pub struct GeminiClient {
    /// HTTP client for API requests (timeout from settings)
    http_client: Client,
    settings: OracleSettings,
}

impl GeminiClient {
    /// Create a client from resolved oracle settings
    pub fn new(settings: OracleSettings) -> Result<Self, OracleError> {
        let http_client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| OracleError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self.settings.json_response_mode.then_some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        }
    }
}

#[async_trait]
impl ExtractionOracle for GeminiClient {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        debug!(
            endpoint = %self.settings.endpoint,
            prompt_length = prompt.len(),
            "Querying Gemini API"
        );

        let response = self
            .http_client
            .post(self.settings.endpoint.as_str())
            .header(API_KEY_HEADER, self.settings.api_key.as_str())
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        debug!(status = status.as_u16(), raw_response = %body, "Gemini raw response");

        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| OracleError::Parse(e.to_string()))?;

        first_candidate_text(parsed)
    }
}

fn transport_error(err: reqwest::Error) -> OracleError {
    if err.is_timeout() {
        OracleError::Timeout
    } else {
        OracleError::Network(err.to_string())
    }
}

/// Pull the first candidate's first text part out of a response
fn first_candidate_text(response: GenerateContentResponse) -> Result<String, OracleError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(OracleError::NoCandidate("candidates array empty".to_string()));
    };

    let Some(content) = candidate.content else {
        return Err(OracleError::NoCandidate("candidate has no content".to_string()));
    };

    content
        .parts
        .into_iter()
        .next()
        .and_then(|part| part.text)
        .ok_or_else(|| OracleError::NoCandidate("candidate has no text part".to_string()))
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}
