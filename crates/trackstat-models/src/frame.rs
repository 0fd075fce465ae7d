//! Per-frame models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fixed reference point all distances are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameCenter {
    pub x: f64,
    pub y: f64,
}

impl FrameCenter {
    /// Create a center at an explicit point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Center of a `width` x `height` frame, halved with integer division.
    ///
    /// Returns `None` for an empty frame.
    pub fn from_dimensions(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x: f64::from(width / 2),
            y: f64::from(height / 2),
        })
    }

    /// Euclidean distance from `point` to this center.
    #[inline]
    pub fn distance_to(&self, point: (f64, f64)) -> f64 {
        (point.0 - self.x).hypot(point.1 - self.y)
    }
}

/// Unique object count for one processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FrameSummary {
    /// Frame number, 1-based
    pub frame_number: u64,
    /// Distinct object ids at or above the confidence threshold
    pub unique_object_count: usize,
}

impl FrameSummary {
    pub fn new(frame_number: u64, unique_object_count: usize) -> Self {
        Self {
            frame_number,
            unique_object_count,
        }
    }
}
