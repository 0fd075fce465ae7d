//! Structured video logging utilities.
//!
//! Attaches the video being analysed to every lifecycle event so runs
//! over many videos can be told apart in aggregated logs.

use std::path::Path;

use tracing::{debug, error, info, warn, Span};

/// Logger for one video analysis run.
#[derive(Debug, Clone)]
pub struct VideoLogger {
    video: String,
    operation: String,
}

impl VideoLogger {
    /// Create a new logger for a video and operation.
    ///
    /// # Arguments
    /// * `video` - Name of the video being analysed
    /// * `operation` - The stage (e.g. "trajectory_analysis")
    pub fn new(video: &str, operation: &str) -> Self {
        Self {
            video: video.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, detections: &Path) {
        info!(
            video = %self.video,
            operation = %self.operation,
            detections = %detections.display(),
            "Analysis started"
        );
    }

    /// Periodic feed checkpoint.
    pub fn log_progress(&self, frames: u64, unique_objects: usize, tracked: usize) {
        debug!(
            video = %self.video,
            operation = %self.operation,
            frames,
            unique_objects,
            tracked,
            "Feed progress"
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            video = %self.video,
            operation = %self.operation,
            "Analysis warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            video = %self.video,
            operation = %self.operation,
            "Analysis error: {}", message
        );
    }

    pub fn log_completion(&self, frames: u64, retained: usize, unreadable: u64) {
        info!(
            video = %self.video,
            operation = %self.operation,
            frames,
            retained,
            unreadable,
            "Analysis completed"
        );
    }

    pub fn video(&self) -> &str {
        &self.video
    }

    /// Create a tracing span for this run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "video",
            video = %self.video,
            operation = %self.operation
        )
    }
}
