//! Final report models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::detection::ObjectId;
use crate::frame::FrameSummary;
use crate::movement::{MovementProportions, MovementVerdict, ObjectMovement};

/// Aggregated statistics for one video.
///
/// Produced once when the frame feed ends; a read-only snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct TrackingReport {
    /// Unique object count per frame, in frame order
    pub frame_summaries: Vec<FrameSummary>,
    /// Objects seen in more than the minimum number of frames
    pub movements: Vec<ObjectMovement>,
    pub proportions: MovementProportions,
    /// Mean unique objects per frame; `None` when no frame was processed
    pub average_unique_objects_per_frame: Option<f64>,
    /// Sum of frame counts over `movements`
    pub total_retained_frames: u64,
}

impl TrackingReport {
    /// Look up the movement row for an object.
    pub fn movement(&self, object_id: ObjectId) -> Option<&ObjectMovement> {
        self.movements.iter().find(|m| m.object_id == object_id)
    }

    /// Number of retained objects with the given verdict.
    pub fn count_verdict(&self, verdict: MovementVerdict) -> usize {
        self.movements
            .iter()
            .filter(|m| m.verdict == verdict)
            .count()
    }
}

/// Provenance of the analysed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceVideoInfo {
    /// Path of the unmasked original recording
    pub original_video_path: String,
    /// Creation timestamp as `DD-MM-YYYY HH:MM:SS`, when it could be read
    pub creation_date: Option<String>,
}
