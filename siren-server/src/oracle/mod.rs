//! Extraction oracle
//!
//! The oracle is an external generative-AI endpoint: prompt text in, reply
//! text out. The normalization pipeline only depends on [`ExtractionOracle`];
//! [`GeminiClient`] is the production implementation.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Oracle call failure
///
/// Every variant is recoverable from the pipeline's point of view: the
/// report is stored through the fallback path instead.
#[derive(Debug, Error)]
pub enum OracleError {
    /// HTTP client could not be constructed
    #[error("Oracle client setup failed: {0}")]
    Client(String),

    /// Connection or transport failure
    #[error("Oracle request failed: {0}")]
    Network(String),

    /// No response within the configured timeout
    #[error("Oracle request timed out")]
    Timeout,

    /// Non-success HTTP status
    #[error("Oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON envelope
    #[error("Failed to parse oracle response: {0}")]
    Parse(String),

    /// Response held no candidate text
    #[error("Oracle returned no usable candidate: {0}")]
    NoCandidate(String),
}

/// Text-in/text-out generative endpoint
#[async_trait]
pub trait ExtractionOracle: Send + Sync {
    /// Oracle name for logging
    fn name(&self) -> &'static str;

    /// Send `prompt` and return the first candidate's first text part
    async fn generate(&self, prompt: &str) -> Result<String, OracleError>;
}
