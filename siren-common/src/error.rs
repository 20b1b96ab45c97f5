//! Common error types for SIREN

use thiserror::Error;

/// Common result type for SIREN operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across SIREN crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}
