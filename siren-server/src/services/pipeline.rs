//! Normalization pipeline
//!
//! Turns a free-text emergency report into an [`IncidentRecord`]:
//!
//! 1. Build the extraction prompt around the raw text
//! 2. Ask the oracle for a JSON object
//! 3. Strip markdown code fences and parse the reply
//! 4. Keep the seven recognized fields, fill `time` when missing
//! 5. Store the record through the bridge, exactly once
//!
//! Any oracle failure (transport, empty candidates, unparseable reply) stores
//! a fallback record instead: the raw text as `summary`, status `Unknown` and
//! the current time.

use serde_json::{Map, Value};
use siren_common::{time, Department, IncidentRecord};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{BridgeError, CaseBridge};
use crate::oracle::ExtractionOracle;

/// Pipeline failure surfaced to the caller
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Empty or blank input; the oracle is not called
    #[error("Text is missing")]
    MissingText,

    /// The record could not be stored
    #[error(transparent)]
    Persistence(#[from] BridgeError),
}

/// Which branch produced the stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    Oracle,
    Fallback,
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// Fields returned to the caller (no `id`)
    pub record: IncidentRecord,
    /// Id the store assigned
    pub case_id: Option<String>,
    pub source: ExtractionSource,
}

/// Reply text that could not be used as an extraction
#[derive(Debug, Error)]
enum ReplyError {
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("reply is JSON but not an object")]
    NotAnObject,
}

/// Free text → oracle → record → store
pub struct NormalizationPipeline {
    oracle: Arc<dyn ExtractionOracle>,
    bridge: CaseBridge,
}

impl NormalizationPipeline {
    pub fn new(oracle: Arc<dyn ExtractionOracle>, bridge: CaseBridge) -> Self {
        Self { oracle, bridge }
    }

    /// Extract a record from `text` and store it
    pub async fn extract_and_store(&self, text: &str) -> Result<ExtractionOutcome, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::MissingText);
        }

        let (record, source) = match self.extract(text).await {
            Some(record) => (record, ExtractionSource::Oracle),
            None => (
                IncidentRecord::fallback(text, time::case_time_now()),
                ExtractionSource::Fallback,
            ),
        };

        let saved = self.bridge.ingest_record(record.clone()).await?;

        info!(
            case_id = saved.id.as_deref().unwrap_or_default(),
            source = ?source,
            "Report normalized"
        );

        Ok(ExtractionOutcome {
            record,
            case_id: saved.id,
            source,
        })
    }

    /// Oracle round trip; `None` means use the fallback record
    async fn extract(&self, text: &str) -> Option<IncidentRecord> {
        let prompt = build_prompt(text);

        let reply = match self.oracle.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    oracle = self.oracle.name(),
                    error = %e,
                    "Oracle call failed, storing fallback record"
                );
                return None;
            }
        };

        debug!(reply = %reply, "Oracle reply");

        match parse_reply(&reply) {
            Ok(object) => Some(normalize(&object)),
            Err(e) => {
                warn!(
                    oracle = self.oracle.name(),
                    error = %e,
                    reply = %reply,
                    "Oracle reply unusable, storing fallback record"
                );
                None
            }
        }
    }
}

/// Prompt asking the oracle for a JSON object describing `text`
pub fn build_prompt(text: &str) -> String {
    format!(
        r#"You are an intelligent JSON extractor for emergency cases.
Analyze the given emergency report text and extract the following fields:
- name
- department (always one of: {departments})
- time
- priority
- location
- summary
- status

Rules:
1. Always return ONLY valid JSON (no markdown, no explanations).
2. If a field is missing in text, omit it (do not output null).
3. Department must be one of the allowed values above.
4. If time is not mentioned, leave it out (backend will auto-fill).

Example Input:
"There is a fire in Building B and two cars are burning."

Example Output:
{{
  "department": "fire",
  "priority": "high",
  "location": "Building B",
  "summary": "Fire incident with two cars burning"
}}

Text: "{text}"
"#,
        departments = Department::allowed_values(),
        text = text,
    )
}

/// Remove ```` ```json ```` / ```` ``` ```` markers and surrounding whitespace
pub fn strip_code_fences(reply: &str) -> String {
    reply.replace("```json", "").replace("```", "").trim().to_string()
}

fn parse_reply(reply: &str) -> Result<Map<String, Value>, ReplyError> {
    match serde_json::from_str::<Value>(&strip_code_fences(reply))? {
        Value::Object(object) => Ok(object),
        _ => Err(ReplyError::NotAnObject),
    }
}

/// Keep recognized fields, canonicalize the department, fill a missing time
fn normalize(object: &Map<String, Value>) -> IncidentRecord {
    let mut record = IncidentRecord::from_extracted(object);

    if let Some(department) = record.department.take() {
        record.department = Some(match Department::parse(&department) {
            Some(known) => known.as_str().to_string(),
            None => {
                warn!(
                    department = %department,
                    "Oracle returned a department outside the allowed set"
                );
                department
            }
        });
    }

    if record.time.is_none() {
        record.time = Some(time::case_time_now());
    }

    record
}
