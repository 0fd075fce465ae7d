//! Video analysis orchestration.
//!
//! Resolves the frame center, feeds tracker output frame by frame into a
//! [`TrajectoryAggregator`] and exports the results. The feed stops at end
//! of stream, on a source error or when the stop flag is raised; in every
//! case the frames seen so far are finalized into a report. A failing
//! annotation file is abandoned without stopping the feed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::Instrument;
use trackstat_core::{FrameDetectionSource, TrajectoryAggregator};
use trackstat_media::{
    probe_video, read_source_info, AnnotationWriter, JsonLinesSource, OutputPaths,
    ReportDocument, ReportExporter,
};
use trackstat_models::{FrameCenter, TrackingReport};

use crate::config::{FrameSize, TrackerConfig};
use crate::error::{CliError, CliResult};
use crate::logging::VideoLogger;
use crate::metrics;

/// Frames between progress log lines.
const PROGRESS_INTERVAL: u64 = 500;

/// Why the frame feed stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEnd {
    /// The source ran out of frames
    EndOfStream,
    /// The stop flag was raised
    Interrupted,
    /// The source failed to produce the next frame
    SourceFailed(String),
}

/// Result of one frame feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedOutcome {
    pub frames: u64,
    pub end: FeedEnd,
    /// Detections the source dropped as unreadable
    pub unreadable: u64,
    /// Set when annotation output was disabled part way through
    pub annotation_error: Option<String>,
}

/// Everything produced for one video.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub report: TrackingReport,
    pub feed: FeedOutcome,
    pub paths: OutputPaths,
    /// Report file, when one was written
    pub report_path: Option<PathBuf>,
    /// Annotation file, when one was written
    pub annotations_path: Option<PathBuf>,
}

/// Feed frames from `source` into `aggregator` until the stream ends.
///
/// Frames are numbered from 1 in the order the source yields them. When an
/// annotation writer is given, each frame's accepted detections are
/// appended to it; the first write failure disables it for the rest of
/// the feed.
pub fn run_feed<S: FrameDetectionSource>(
    aggregator: &mut TrajectoryAggregator,
    source: &mut S,
    mut annotations: Option<&mut AnnotationWriter>,
    logger: &VideoLogger,
    stop: &AtomicBool,
) -> FeedOutcome {
    let mut frames = 0u64;
    let mut annotation_error = None;

    let end = loop {
        if stop.load(Ordering::Relaxed) {
            break FeedEnd::Interrupted;
        }

        let detections = match source.next_frame() {
            Ok(Some(detections)) => detections,
            Ok(None) => break FeedEnd::EndOfStream,
            Err(e) => {
                logger.log_warning(&format!(
                    "Frame read from {} failed after {} frames: {}",
                    source.name(),
                    frames,
                    e
                ));
                break FeedEnd::SourceFailed(e.to_string());
            }
        };

        frames += 1;
        let summary = aggregator.process_frame(frames, &detections);

        let written = match annotations.as_deref_mut() {
            Some(writer) => writer.write_frame(frames, aggregator.accepted_detections()),
            None => Ok(()),
        };
        if let Err(e) = written {
            logger.log_warning(&format!(
                "Annotation output disabled at frame {}: {}",
                frames, e
            ));
            annotation_error = Some(e.to_string());
            annotations = None;
        }

        if frames % PROGRESS_INTERVAL == 0 {
            logger.log_progress(frames, summary.unique_object_count, aggregator.object_count());
        }
    };

    FeedOutcome {
        frames,
        end,
        unreadable: source.dropped_detections(),
        annotation_error,
    }
}

/// Frame center from an explicit size or by probing the video.
pub async fn resolve_frame_center(
    video: &Path,
    frame_size: Option<FrameSize>,
) -> CliResult<FrameCenter> {
    let (width, height) = match frame_size {
        Some(size) => (size.width, size.height),
        None => {
            let info = probe_video(video)
                .await
                .map_err(|e| CliError::FrameCenterUnavailable(e.to_string()))?;
            (info.width, info.height)
        }
    };

    FrameCenter::from_dimensions(width, height).ok_or_else(|| {
        CliError::FrameCenterUnavailable(format!("frame size {}x{}", width, height))
    })
}

/// Analyse one video end to end.
pub async fn analyze_video(
    detections: &Path,
    video: &Path,
    config: &TrackerConfig,
    stop: Arc<AtomicBool>,
) -> CliResult<AnalysisOutput> {
    let video_name = video
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| video.display().to_string());
    let logger = VideoLogger::new(&video_name, "trajectory_analysis");
    let span = logger.create_span();

    analyze(detections, video, config, stop, logger)
        .instrument(span)
        .await
}

async fn analyze(
    detections: &Path,
    video: &Path,
    config: &TrackerConfig,
    stop: Arc<AtomicBool>,
    logger: VideoLogger,
) -> CliResult<AnalysisOutput> {
    logger.log_start(detections);

    let paths = OutputPaths::derive(video, &config.output_dir);

    let frame_center = match resolve_frame_center(video, config.frame_size).await {
        Ok(center) => center,
        Err(e) => {
            logger.log_error(&e.to_string());
            return Err(e);
        }
    };

    let mut aggregator = TrajectoryAggregator::new(frame_center, config.aggregator.clone())?;
    let mut source = JsonLinesSource::open(detections)?;
    let mut writer = if config.save_annotations {
        match AnnotationWriter::create(&paths.annotations) {
            Ok(writer) => Some(writer),
            Err(e) => {
                logger.log_warning(&format!("Annotation output unavailable: {}", e));
                metrics::record_annotation_failure();
                None
            }
        }
    } else {
        None
    };

    let feed_logger = logger.clone();
    let feed_task = tokio::task::spawn_blocking(move || {
        let feed = run_feed(
            &mut aggregator,
            &mut source,
            writer.as_mut(),
            &feed_logger,
            &stop,
        );
        (aggregator, writer, feed)
    });
    let (aggregator, writer, feed) = feed_task
        .await
        .map_err(|e| CliError::processing_failed(format!("Feed task failed: {}", e)))?;

    let annotations_path = match writer {
        Some(_) if feed.annotation_error.is_some() => {
            metrics::record_annotation_failure();
            None
        }
        Some(writer) => match writer.finish() {
            Ok(path) => Some(path),
            Err(e) => {
                logger.log_warning(&format!("Annotation output lost: {}", e));
                metrics::record_annotation_failure();
                None
            }
        },
        None => None,
    };

    metrics::record_feed(feed.frames, feed.unreadable, aggregator.stats());
    match &feed.end {
        FeedEnd::EndOfStream => {}
        FeedEnd::Interrupted => {
            metrics::record_interrupted();
            logger.log_warning(&format!("Stopped after {} frames", feed.frames));
        }
        FeedEnd::SourceFailed(reason) => {
            logger.log_warning(&format!(
                "Detection source failed after {} frames: {}",
                feed.frames, reason
            ));
        }
    }

    let report = aggregator.finalize();

    let report_path = if config.save_report {
        let source_info = read_source_info(&paths.original_video).await;
        let document = ReportDocument::new(logger.video(), report.clone(), source_info);
        ReportExporter::write_report(&document, &paths.report)?;
        Some(paths.report.clone())
    } else {
        None
    };

    logger.log_completion(feed.frames, report.movements.len(), feed.unreadable);

    Ok(AnalysisOutput {
        report,
        feed,
        paths,
        report_path,
        annotations_path,
    })
}
