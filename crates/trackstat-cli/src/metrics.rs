//! Run metrics.
//!
//! Counters are no-ops unless the embedding application installs a
//! `metrics` recorder.

use metrics::counter;
use trackstat_core::AggregatorStats;

/// Metric names as constants for consistency.
pub mod names {
    pub const FRAMES_PROCESSED_TOTAL: &str = "trackstat_frames_processed_total";
    pub const DETECTIONS_TOTAL: &str = "trackstat_detections_total";
    pub const FEEDS_INTERRUPTED_TOTAL: &str = "trackstat_feeds_interrupted_total";
    pub const VIDEOS_FAILED_TOTAL: &str = "trackstat_videos_failed_total";
    pub const ANNOTATION_FAILURES_TOTAL: &str = "trackstat_annotation_failures_total";
}

/// Record frame and screening totals for a finished feed.
///
/// `unreadable` counts detections the source dropped before screening.
pub fn record_feed(frames: u64, unreadable: u64, stats: AggregatorStats) {
    counter!(names::FRAMES_PROCESSED_TOTAL).increment(frames);
    counter!(names::DETECTIONS_TOTAL, "outcome" => "unreadable").increment(unreadable);
    counter!(names::DETECTIONS_TOTAL, "outcome" => "accepted").increment(stats.accepted);
    counter!(names::DETECTIONS_TOTAL, "outcome" => "low_confidence")
        .increment(stats.low_confidence);
    counter!(names::DETECTIONS_TOTAL, "outcome" => "malformed").increment(stats.malformed);
}

/// Record a feed stopped by the user.
pub fn record_interrupted() {
    counter!(names::FEEDS_INTERRUPTED_TOTAL).increment(1);
}

/// Record an annotation file abandoned after a write failure.
pub fn record_annotation_failure() {
    counter!(names::ANNOTATION_FAILURES_TOTAL).increment(1);
}

/// Record a video that could not be analysed.
pub fn record_failure() {
    counter!(names::VIDEOS_FAILED_TOTAL).increment(1);
}
