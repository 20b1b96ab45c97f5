//! Persistence glue between JSON payloads and the case store
//!
//! Used by the normalization pipeline, the start-up seed path and direct
//! JSON submission.

use serde_json::Value;
use siren_common::IncidentRecord;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::db::CaseStore;

/// Payload could not be stored
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Payload is not valid JSON
    #[error("Failed to parse and save case: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Payload is valid JSON but not an object
    #[error("Failed to parse and save case: expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// Store rejected the write
    #[error("Failed to parse and save case: {0}")]
    Store(#[from] siren_common::Error),
}

/// Deserializes payloads into [`IncidentRecord`] and saves them
#[derive(Clone)]
pub struct CaseBridge {
    store: Arc<dyn CaseStore>,
}

impl CaseBridge {
    pub fn new(store: Arc<dyn CaseStore>) -> Self {
        Self { store }
    }

    /// Parse a JSON object and save it
    ///
    /// Unknown fields are ignored, missing ones stay absent. Nothing is saved
    /// when parsing fails.
    pub async fn ingest(&self, payload: &str) -> Result<IncidentRecord, BridgeError> {
        self.ingest_slice(payload.as_bytes()).await
    }

    /// Raw request body variant of [`ingest`](Self::ingest)
    ///
    /// Bytes that are not valid UTF-8 fail like any other malformed JSON.
    pub async fn ingest_slice(&self, payload: &[u8]) -> Result<IncidentRecord, BridgeError> {
        let value: Value = serde_json::from_slice(payload)?;
        self.ingest_value(value).await
    }

    /// Save an already parsed JSON value, which must be an object
    pub async fn ingest_value(&self, value: Value) -> Result<IncidentRecord, BridgeError> {
        if !value.is_object() {
            return Err(BridgeError::NotAnObject(json_kind(&value)));
        }

        let record: IncidentRecord = serde_json::from_value(value)?;
        self.ingest_record(record).await
    }

    /// Seed file contents: one object or an array of objects
    ///
    /// Stops at the first entry that fails; earlier entries stay stored.
    pub async fn ingest_seed(&self, payload: &str) -> Result<Vec<IncidentRecord>, BridgeError> {
        let entries = match serde_json::from_str::<Value>(payload)? {
            Value::Array(entries) => entries,
            other => vec![other],
        };

        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            saved.push(self.ingest_value(entry).await?);
        }

        Ok(saved)
    }

    /// Save a typed record
    pub async fn ingest_record(
        &self,
        record: IncidentRecord,
    ) -> Result<IncidentRecord, BridgeError> {
        let saved = self.store.save(record).await?;

        info!(
            case_id = saved.id.as_deref().unwrap_or_default(),
            department = saved.department.as_deref().unwrap_or("-"),
            "Case stored"
        );

        Ok(saved)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
