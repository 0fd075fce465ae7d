//! CLI error types.

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Frame center unavailable: {0}")]
    FrameCenterUnavailable(String),

    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Core error: {0}")]
    Core(#[from] trackstat_core::CoreError),

    #[error("Media error: {0}")]
    Media(#[from] trackstat_media::MediaError),
}

impl CliError {
    pub fn processing_failed(msg: impl Into<String>) -> Self {
        Self::ProcessingFailed(msg.into())
    }

    /// Whether the video could not be analysed at all, as opposed to
    /// failing part way through.
    pub fn is_unreadable_video(&self) -> bool {
        matches!(self, CliError::FrameCenterUnavailable(_))
    }
}
