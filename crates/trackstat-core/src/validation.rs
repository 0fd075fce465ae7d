//! Detection screening.
//!
//! Every raw tracker record is classified before the aggregator mutates
//! anything: accepted, below the confidence threshold, or malformed.
//! Only an accepted detection reaches per-object state.

use thiserror::Error;
use trackstat_models::{BoundingBox, Detection, ObjectId, RawDetection};

/// Why a raw detection could not be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidDetection {
    #[error("detection has no track id")]
    MissingId,

    #[error("track id {0} is out of range")]
    IdOutOfRange(i64),

    #[error("detection has no bounding box")]
    MissingBbox,

    #[error("bounding box must be 4 finite coordinates, got {0:?}")]
    MalformedBbox(Vec<f64>),

    #[error("confidence {0} is not a finite number")]
    NonFiniteConfidence(f64),
}

/// Outcome of screening one raw detection.
#[derive(Debug, Clone, PartialEq)]
pub enum Screened {
    Accepted(Detection),
    LowConfidence,
    Invalid(InvalidDetection),
}

/// Validate the structure of a raw detection.
pub fn validate_detection(raw: &RawDetection) -> Result<Detection, InvalidDetection> {
    if !raw.conf.is_finite() {
        return Err(InvalidDetection::NonFiniteConfidence(raw.conf));
    }

    let id = raw.id.ok_or(InvalidDetection::MissingId)?;
    let object_id = ObjectId::try_from(id).map_err(|_| InvalidDetection::IdOutOfRange(id))?;

    let coords = raw.bbox.as_deref().ok_or(InvalidDetection::MissingBbox)?;
    let bbox = BoundingBox::from_slice(coords)
        .ok_or_else(|| InvalidDetection::MalformedBbox(coords.to_vec()))?;

    Ok(Detection::new(object_id, bbox, raw.conf))
}

/// Screen a raw detection against a confidence threshold.
///
/// Confidence is checked before structure, so a low-confidence record
/// with a missing id counts as low confidence.
pub fn screen(raw: &RawDetection, confidence_threshold: f64) -> Screened {
    if raw.conf.is_finite() && raw.conf < confidence_threshold {
        return Screened::LowConfidence;
    }
    match validate_detection(raw) {
        Ok(detection) => Screened::Accepted(detection),
        Err(reason) => Screened::Invalid(reason),
    }
}
