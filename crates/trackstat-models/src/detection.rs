//! Detection models exchanged with the upstream tracker.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Persistent track identifier assigned by the upstream tracker.
pub type ObjectId = u32;

/// How the center of a bounding box is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Midpoint {
    /// Floating-point midpoint `(a + b) / 2`.
    #[default]
    Exact,
    /// Floor-division midpoint `floor((a + b) / 2)`, matching legacy reports.
    Floor,
}

/// Bounding box in frame pixel coordinates, corner form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    /// Left edge x-coordinate
    pub x1: f64,
    /// Top edge y-coordinate
    pub y1: f64,
    /// Right edge x-coordinate
    pub x2: f64,
    /// Bottom edge y-coordinate
    pub y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build from a `[x1, y1, x2, y2]` slice.
    ///
    /// Returns `None` unless the slice holds exactly four finite values.
    pub fn from_slice(coords: &[f64]) -> Option<Self> {
        match coords {
            [x1, y1, x2, y2] if coords.iter().all(|c| c.is_finite()) => {
                Some(Self::new(*x1, *y1, *x2, *y2))
            }
            _ => None,
        }
    }

    /// Box width in pixels.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Box height in pixels.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Box center using the given midpoint rule.
    pub fn center(&self, midpoint: Midpoint) -> (f64, f64) {
        let cx = (self.x1 + self.x2) / 2.0;
        let cy = (self.y1 + self.y2) / 2.0;
        match midpoint {
            Midpoint::Exact => (cx, cy),
            Midpoint::Floor => (cx.floor(), cy.floor()),
        }
    }

    /// Corners as an array, in the order the tracker emits them.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

/// One tracker output record, before validation.
///
/// Any field may be missing or out of range; the aggregator classifies
/// each record before it touches any state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawDetection {
    /// Track id, absent when the tracker has not assigned one yet
    #[serde(default)]
    pub id: Option<i64>,
    /// Corners `[x1, y1, x2, y2]`
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
    /// Detection confidence in [0, 1]
    pub conf: f64,
}

impl RawDetection {
    /// Create a well-formed raw detection.
    pub fn new(id: i64, bbox: BoundingBox, conf: f64) -> Self {
        Self {
            id: Some(id),
            bbox: Some(bbox.to_array().to_vec()),
            conf,
        }
    }

    /// Create a detection the tracker did not assign an id to.
    pub fn untracked(bbox: BoundingBox, conf: f64) -> Self {
        Self {
            id: None,
            bbox: Some(bbox.to_array().to_vec()),
            conf,
        }
    }
}

/// A validated detection of one object in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Detection {
    /// Track id
    pub object_id: ObjectId,
    /// Bounding box in pixel coordinates
    pub bbox: BoundingBox,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
}

impl Detection {
    /// Create a new detection.
    pub fn new(object_id: ObjectId, bbox: BoundingBox, confidence: f64) -> Self {
        Self {
            object_id,
            bbox,
            confidence,
        }
    }

    /// Overlay label drawn next to the box.
    pub fn label(&self) -> String {
        format!("ID {} Conf: {:.2}", self.object_id, self.confidence)
    }
}
