//! Frame detection source trait.

use trackstat_models::RawDetection;

/// Supplies tracker output one frame at a time.
///
/// Implemented by adapters around the detection/tracking model or a dump
/// of its output. Frames must be yielded in display order.
pub trait FrameDetectionSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Detections for the next frame, or `Ok(None)` at end of stream.
    fn next_frame(&mut self) -> Result<Option<Vec<RawDetection>>, Self::Error>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Detections discarded before reaching the aggregator, because they
    /// could not be read at all.
    fn dropped_detections(&self) -> u64 {
        0
    }
}

/// In-memory source, mainly for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    frames: std::collections::VecDeque<Vec<RawDetection>>,
}

impl VecSource {
    pub fn new(frames: Vec<Vec<RawDetection>>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl FrameDetectionSource for VecSource {
    type Error = std::convert::Infallible;

    fn next_frame(&mut self) -> Result<Option<Vec<RawDetection>>, Self::Error> {
        Ok(self.frames.pop_front())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
