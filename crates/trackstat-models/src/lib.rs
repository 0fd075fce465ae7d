//! Shared data models for trackstat.
//!
//! This crate provides Serde-serializable types for:
//! - Tracker detections, raw and validated
//! - Per-frame summaries and the frame center
//! - Movement verdicts and the final report

pub mod detection;
pub mod frame;
pub mod movement;
pub mod report;

// Re-export common types
pub use detection::{BoundingBox, Detection, Midpoint, ObjectId, RawDetection};
pub use frame::{FrameCenter, FrameSummary};
pub use movement::{MovementProportions, MovementVerdict, ObjectMovement};
pub use report::{SourceVideoInfo, TrackingReport};
