//! # SIREN Common Library
//!
//! Shared code for the SIREN incident service:
//! - Incident record model and department categories
//! - Common error type
//! - Configuration loading (TOML bootstrap file + defaults)
//! - Timestamp helpers for case times

pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::{Department, IncidentRecord};
