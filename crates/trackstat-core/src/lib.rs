//! Trajectory aggregation and movement classification.
//!
//! This crate provides:
//! - Screening of raw tracker detections (confidence and structure)
//! - Per-object frame counts and distance-to-center histories
//! - Closer/further classification over opening and closing windows
//! - The final [`TrackingReport`](trackstat_models::TrackingReport)
//!
//! Everything here is synchronous and free of I/O.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod movement;
pub mod source;
pub mod validation;

pub use aggregator::{AggregatorStats, TrajectoryAggregator};
pub use config::AggregatorConfig;
pub use error::{CoreError, CoreResult};
pub use movement::{classify_movement, Classification};
pub use source::{FrameDetectionSource, VecSource};
pub use validation::{screen, validate_detection, InvalidDetection, Screened};
