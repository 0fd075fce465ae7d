//! Error types for the aggregation core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while setting up an aggregator.
///
/// Per-detection problems are never errors; see [`crate::validation`].
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid aggregator config: {0}")]
    InvalidConfig(String),

    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidFrameDimensions { width: u32, height: u32 },
}

impl CoreError {
    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
