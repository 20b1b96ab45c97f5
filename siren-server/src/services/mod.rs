//! Incident services
//!
//! - [`CaseBridge`]: JSON payload or typed record → store
//! - [`NormalizationPipeline`]: free text → oracle → record → bridge
//! - [`QueryService`]: department listing and deletion

pub mod bridge;
pub mod pipeline;
pub mod query;

pub use bridge::{BridgeError, CaseBridge};
pub use pipeline::{ExtractionOutcome, ExtractionSource, NormalizationPipeline, PipelineError};
pub use query::QueryService;
