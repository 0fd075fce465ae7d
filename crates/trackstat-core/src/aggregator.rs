//! Per-object trajectory aggregation.
//!
//! The aggregator consumes one frame of tracker output at a time and keeps,
//! for every object id it has accepted, the number of frames it appeared in
//! and its distance to the frame center in each of them. When the feed ends
//! `finalize` derives the movement table and the summary figures.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};
use trackstat_models::{
    Detection, FrameCenter, FrameSummary, MovementProportions, MovementVerdict, ObjectId,
    ObjectMovement, RawDetection, TrackingReport,
};

use crate::config::AggregatorConfig;
use crate::error::{CoreError, CoreResult};
use crate::movement::classify_movement;
use crate::validation::{screen, Screened};

/// Running state for one tracked object.
#[derive(Debug, Clone)]
struct ObjectState {
    object_id: ObjectId,
    /// Frames the object was accepted in
    frame_count: u64,
    /// Distance to the frame center, one entry per acceptance, in frame order
    distances: Vec<f64>,
}

/// Screening counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorStats {
    pub accepted: u64,
    pub low_confidence: u64,
    pub malformed: u64,
}

/// Aggregates tracker output for a single video.
///
/// One instance per video; it is not meant to be shared between feeds.
#[derive(Debug)]
pub struct TrajectoryAggregator {
    config: AggregatorConfig,
    frame_center: FrameCenter,
    /// Objects in order of first appearance
    objects: Vec<ObjectState>,
    /// Object id -> index into `objects`
    index: HashMap<ObjectId, usize>,
    frame_summaries: Vec<FrameSummary>,
    /// Accepted detections of the most recent frame
    accepted: Vec<Detection>,
    stats: AggregatorStats,
}

impl TrajectoryAggregator {
    /// Create an aggregator measuring distances against `frame_center`.
    pub fn new(frame_center: FrameCenter, config: AggregatorConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            frame_center,
            objects: Vec::new(),
            index: HashMap::new(),
            frame_summaries: Vec::new(),
            accepted: Vec::new(),
            stats: AggregatorStats::default(),
        })
    }

    /// Create an aggregator for frames of the given pixel size.
    pub fn for_frame_size(width: u32, height: u32, config: AggregatorConfig) -> CoreResult<Self> {
        let center = FrameCenter::from_dimensions(width, height)
            .ok_or(CoreError::InvalidFrameDimensions { width, height })?;
        Self::new(center, config)
    }

    /// Fold one frame of detections into the running state.
    ///
    /// Detections below the confidence threshold and malformed detections
    /// are skipped without touching any state; the rest of the frame is
    /// still processed.
    pub fn process_frame(&mut self, frame_number: u64, detections: &[RawDetection]) -> FrameSummary {
        if let Some(last) = self.frame_summaries.last() {
            if frame_number != last.frame_number + 1 {
                warn!(
                    frame_number,
                    previous = last.frame_number,
                    "Non-consecutive frame number"
                );
            }
        }

        self.accepted.clear();
        let mut unique_ids: HashSet<ObjectId> = HashSet::new();

        for raw in detections {
            let detection = match screen(raw, self.config.confidence_threshold) {
                Screened::Accepted(detection) => detection,
                Screened::LowConfidence => {
                    self.stats.low_confidence += 1;
                    continue;
                }
                Screened::Invalid(reason) => {
                    self.stats.malformed += 1;
                    debug!(frame_number, %reason, "Skipping malformed detection");
                    continue;
                }
            };

            unique_ids.insert(detection.object_id);
            self.record(&detection);
            self.accepted.push(detection);
            self.stats.accepted += 1;
        }

        let summary = FrameSummary::new(frame_number, unique_ids.len());
        self.frame_summaries.push(summary);
        summary
    }

    fn record(&mut self, detection: &Detection) {
        let distance = self
            .frame_center
            .distance_to(detection.bbox.center(self.config.midpoint));

        let slot = match self.index.get(&detection.object_id) {
            Some(&slot) => slot,
            None => {
                self.objects.push(ObjectState {
                    object_id: detection.object_id,
                    frame_count: 0,
                    distances: Vec::new(),
                });
                let slot = self.objects.len() - 1;
                self.index.insert(detection.object_id, slot);
                slot
            }
        };

        let state = &mut self.objects[slot];
        state.frame_count += 1;
        state.distances.push(distance);
    }

    /// Accepted detections of the most recently processed frame.
    pub fn accepted_detections(&self) -> &[Detection] {
        &self.accepted
    }

    /// Frames an object has been accepted in so far.
    pub fn frame_count(&self, object_id: ObjectId) -> Option<u64> {
        self.state(object_id).map(|s| s.frame_count)
    }

    /// Distance history of an object, in frame order.
    pub fn distance_history(&self, object_id: ObjectId) -> Option<&[f64]> {
        self.state(object_id).map(|s| s.distances.as_slice())
    }

    fn state(&self, object_id: ObjectId) -> Option<&ObjectState> {
        self.index.get(&object_id).map(|&slot| &self.objects[slot])
    }

    pub fn frame_summaries(&self) -> &[FrameSummary] {
        &self.frame_summaries
    }

    pub fn frames_processed(&self) -> usize {
        self.frame_summaries.len()
    }

    /// Distinct objects accepted so far.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn frame_center(&self) -> FrameCenter {
        self.frame_center
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn stats(&self) -> AggregatorStats {
        self.stats
    }

    /// Build the report from everything processed so far.
    ///
    /// Does not consume or modify the aggregator; calling it twice without
    /// processing more frames yields identical reports.
    pub fn finalize(&self) -> TrackingReport {
        let movements: Vec<ObjectMovement> = self
            .objects
            .iter()
            .filter(|state| state.frame_count > self.config.retain_above_frames)
            .filter_map(|state| {
                let c = classify_movement(&state.distances, self.config.window_size)?;
                Some(ObjectMovement {
                    object_id: state.object_id,
                    frame_count: state.frame_count,
                    verdict: c.verdict,
                    first_window_mean: c.first_mean,
                    last_window_mean: c.last_mean,
                })
            })
            .collect();

        let total_retained_frames: u64 = movements.iter().map(|m| m.frame_count).sum();
        let closer_frames: u64 = movements
            .iter()
            .filter(|m| m.verdict == MovementVerdict::Closer)
            .map(|m| m.frame_count)
            .sum();
        let further_frames = total_retained_frames - closer_frames;

        let proportions = if total_retained_frames > 0 {
            MovementProportions {
                closer: closer_frames as f64 / total_retained_frames as f64,
                further: further_frames as f64 / total_retained_frames as f64,
            }
        } else {
            MovementProportions::default()
        };

        let average_unique_objects_per_frame = if self.frame_summaries.is_empty() {
            None
        } else {
            let total: usize = self
                .frame_summaries
                .iter()
                .map(|s| s.unique_object_count)
                .sum();
            Some(total as f64 / self.frame_summaries.len() as f64)
        };

        info!(
            frames = self.frame_summaries.len(),
            objects = self.objects.len(),
            retained = movements.len(),
            proportion_closer = proportions.closer,
            "Trajectory report finalized"
        );

        TrackingReport {
            frame_summaries: self.frame_summaries.clone(),
            movements,
            proportions,
            average_unique_objects_per_frame,
            total_retained_frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackstat_models::{BoundingBox, Midpoint};

    /// Box of side 2 centered on `(cx, cy)`.
    fn boxed(cx: f64, cy: f64) -> BoundingBox {
        BoundingBox::new(cx - 1.0, cy - 1.0, cx + 1.0, cy + 1.0)
    }

    /// Raw detection whose center lies `distance` to the right of the origin.
    fn at_distance(id: i64, distance: f64, conf: f64) -> RawDetection {
        RawDetection::new(id, boxed(distance, 0.0), conf)
    }

    fn aggregator() -> TrajectoryAggregator {
        TrajectoryAggregator::new(FrameCenter::new(0.0, 0.0), AggregatorConfig::default()).unwrap()
    }

    /// Feed one detection per frame for the given distance sequence.
    fn feed(agg: &mut TrajectoryAggregator, id: i64, distances: &[f64]) {
        for &d in distances {
            let frame = agg.frames_processed() as u64 + 1;
            agg.process_frame(frame, &[at_distance(id, d, 0.9)]);
        }
    }

    #[test]
    fn test_mixed_confidence_frame_counts_only_accepted() {
        let mut agg = aggregator();
        let summary = agg.process_frame(
            1,
            &[at_distance(1, 10.0, 0.4), at_distance(2, 10.0, 0.6)],
        );
        assert_eq!(summary, FrameSummary::new(1, 1));
        assert_eq!(agg.frame_count(1), None);
        assert_eq!(agg.frame_count(2), Some(1));
        assert_eq!(agg.accepted_detections().len(), 1);
        assert_eq!(agg.accepted_detections()[0].object_id, 2);
    }

    #[test]
    fn test_low_confidence_never_touches_state() {
        let mut agg = aggregator();
        for frame in 1..=10 {
            agg.process_frame(frame, &[at_distance(5, 3.0, 0.49)]);
        }
        assert_eq!(agg.object_count(), 0);
        assert!(agg.distance_history(5).is_none());
        assert!(agg.frame_summaries().iter().all(|s| s.unique_object_count == 0));
        assert_eq!(agg.stats().low_confidence, 10);
    }

    #[test]
    fn test_one_summary_per_frame_in_order() {
        let mut agg = aggregator();
        agg.process_frame(1, &[]);
        agg.process_frame(2, &[at_distance(1, 1.0, 0.9)]);
        agg.process_frame(3, &[]);

        let numbers: Vec<u64> = agg.frame_summaries().iter().map(|s| s.frame_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_frame_number_gap_is_still_recorded() {
        let mut agg = aggregator();
        agg.process_frame(1, &[at_distance(1, 1.0, 0.9)]);
        let summary = agg.process_frame(5, &[at_distance(1, 2.0, 0.9)]);

        assert_eq!(summary, FrameSummary::new(5, 1));
        let numbers: Vec<u64> = agg.frame_summaries().iter().map(|s| s.frame_number).collect();
        assert_eq!(numbers, vec![1, 5]);
        assert_eq!(agg.frame_count(1), Some(2));
        assert_eq!(agg.distance_history(1).unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_frame_count_matches_frames_present() {
        let mut agg = aggregator();
        for frame in 1..=20 {
            let dets = if frame % 4 == 0 {
                vec![at_distance(9, 1.0, 0.8)]
            } else {
                vec![]
            };
            agg.process_frame(frame, &dets);
        }
        assert_eq!(agg.frame_count(9), Some(5));
        assert_eq!(agg.distance_history(9).unwrap().len(), 5);
    }

    #[test]
    fn test_duplicate_ids_in_frame_count_once_for_summary() {
        let mut agg = aggregator();
        let summary = agg.process_frame(
            1,
            &[at_distance(4, 1.0, 0.9), at_distance(4, 2.0, 0.8)],
        );
        assert_eq!(summary.unique_object_count, 1);
    }

    #[test]
    fn test_malformed_detection_does_not_abort_frame() {
        let mut agg = aggregator();
        let dets = [
            RawDetection::untracked(boxed(1.0, 1.0), 0.9),
            RawDetection {
                id: Some(2),
                bbox: Some(vec![1.0, 2.0]),
                conf: 0.9,
            },
            at_distance(3, 5.0, 0.9),
        ];
        let summary = agg.process_frame(1, &dets);
        assert_eq!(summary.unique_object_count, 1);
        assert_eq!(agg.frame_count(3), Some(1));
        assert_eq!(agg.stats().malformed, 2);
        assert_eq!(agg.stats().accepted, 1);
    }

    #[test]
    fn test_distance_uses_frame_center() {
        let mut agg =
            TrajectoryAggregator::for_frame_size(200, 100, AggregatorConfig::default()).unwrap();
        // Center is (100, 50); box center (103, 54) is 5 px away.
        agg.process_frame(1, &[RawDetection::new(1, boxed(103.0, 54.0), 0.9)]);
        assert_eq!(agg.distance_history(1).unwrap(), &[5.0]);
    }

    #[test]
    fn test_exact_and_floor_midpoints_differ() {
        let raw = RawDetection::new(1, BoundingBox::new(0.0, 0.0, 3.0, 0.0), 0.9);

        let mut exact = aggregator();
        exact.process_frame(1, &[raw.clone()]);
        assert_eq!(exact.distance_history(1).unwrap(), &[1.5]);

        let mut legacy =
            TrajectoryAggregator::new(FrameCenter::new(0.0, 0.0), AggregatorConfig::legacy())
                .unwrap();
        assert_eq!(legacy.config().midpoint, Midpoint::Floor);
        legacy.process_frame(1, &[raw]);
        assert_eq!(legacy.distance_history(1).unwrap(), &[1.0]);
    }

    #[test]
    fn test_approaching_object_is_closer_and_retained() {
        let mut agg = aggregator();
        let mut distances = vec![100.0; 5];
        distances.extend(std::iter::repeat(50.0).take(30));
        distances.extend(vec![10.0; 5]);
        feed(&mut agg, 7, &distances);

        let report = agg.finalize();
        let row = report.movement(7).unwrap();
        assert_eq!(row.frame_count, 40);
        assert_eq!(row.verdict, MovementVerdict::Closer);
        assert_eq!(row.first_window_mean, 100.0);
        assert_eq!(row.last_window_mean, 10.0);
        assert_eq!(report.proportions.closer, 1.0);
        assert_eq!(report.proportions.further, 0.0);
    }

    #[test]
    fn test_short_lived_object_is_excluded() {
        let mut agg = aggregator();
        feed(&mut agg, 3, &[50.0, 40.0, 30.0, 20.0, 10.0]);

        let report = agg.finalize();
        assert!(report.movement(3).is_none());
        assert_eq!(report.total_retained_frames, 0);
        assert_eq!(report.proportions, MovementProportions::default());
    }

    #[test]
    fn test_retention_boundary_is_strict() {
        let mut agg = aggregator();
        feed(&mut agg, 1, &[10.0; 30]);
        feed(&mut agg, 2, &[10.0; 31]);

        let report = agg.finalize();
        assert!(report.movement(1).is_none());
        assert_eq!(report.movement(2).unwrap().frame_count, 31);
        assert_eq!(report.movements.len(), 1);
    }

    #[test]
    fn test_proportions_are_frame_weighted() {
        let mut agg = aggregator();
        // 40 frames approaching, 60 frames receding.
        let mut approaching = vec![100.0; 35];
        approaching.extend(vec![1.0; 5]);
        feed(&mut agg, 1, &approaching);
        let mut receding = vec![1.0; 55];
        receding.extend(vec![100.0; 5]);
        feed(&mut agg, 2, &receding);

        let report = agg.finalize();
        assert_eq!(report.total_retained_frames, 100);
        assert!((report.proportions.closer - 0.4).abs() < 1e-12);
        assert!((report.proportions.further - 0.6).abs() < 1e-12);
        assert!((report.proportions.closer + report.proportions.further - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_movements_in_first_seen_order() {
        let mut agg = aggregator();
        for frame in 1..=31 {
            agg.process_frame(
                frame,
                &[at_distance(9, 1.0, 0.9), at_distance(2, 1.0, 0.9)],
            );
        }
        let ids: Vec<ObjectId> = agg.finalize().movements.iter().map(|m| m.object_id).collect();
        assert_eq!(ids, vec![9, 2]);
    }

    #[test]
    fn test_average_unique_objects() {
        let mut agg = aggregator();
        agg.process_frame(1, &[at_distance(1, 1.0, 0.9), at_distance(2, 1.0, 0.9)]);
        agg.process_frame(2, &[]);
        agg.process_frame(3, &[at_distance(1, 1.0, 0.9)]);
        agg.process_frame(4, &[at_distance(3, 1.0, 0.1)]);

        let report = agg.finalize();
        assert_eq!(report.average_unique_objects_per_frame, Some(0.75));
    }

    #[test]
    fn test_finalize_without_frames() {
        let report = aggregator().finalize();
        assert!(report.frame_summaries.is_empty());
        assert!(report.movements.is_empty());
        assert_eq!(report.average_unique_objects_per_frame, None);
        assert_eq!(report.proportions, MovementProportions::default());
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut agg = aggregator();
        feed(&mut agg, 1, &[3.0, 7.0, 11.0, 13.0].repeat(10));
        feed(&mut agg, 2, &[1.0; 12]);

        let first = agg.finalize();
        let second = agg.finalize();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_frame_size_is_rejected() {
        let err = TrajectoryAggregator::for_frame_size(0, 480, AggregatorConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidFrameDimensions { width: 0, height: 480 }
        ));
    }
}
