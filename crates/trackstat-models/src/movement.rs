//! Movement classification models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::detection::ObjectId;

/// Whether an object trended toward or away from the frame center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum MovementVerdict {
    /// Ended nearer to the center than it started
    Closer,
    /// Ended at the same distance or further away
    Further,
}

impl MovementVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementVerdict::Closer => "Closer",
            MovementVerdict::Further => "Further",
        }
    }
}

impl fmt::Display for MovementVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the movement table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectMovement {
    pub object_id: ObjectId,
    /// Frames the object was accepted in
    pub frame_count: u64,
    pub verdict: MovementVerdict,
    /// Mean distance over the opening window
    pub first_window_mean: f64,
    /// Mean distance over the closing window
    pub last_window_mean: f64,
}

/// Frame-weighted share of each verdict among retained objects.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct MovementProportions {
    pub closer: f64,
    pub further: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&MovementVerdict::Closer).unwrap(),
            "\"Closer\""
        );
        assert_eq!(MovementVerdict::Further.to_string(), "Further");
    }
}
