//! Command line arguments.

use clap::Parser;
use std::path::PathBuf;
use trackstat_models::Midpoint;

use crate::config::{FrameSize, TrackerConfig};

/// Per-object dwell time and movement statistics from tracker output.
#[derive(Debug, Parser)]
#[command(name = "trackstat", version, about)]
pub struct Args {
    /// JSON Lines dump of per-frame tracker detections
    #[arg(long)]
    pub detections: PathBuf,

    /// Video the detections were produced from
    #[arg(long)]
    pub video: PathBuf,

    /// Directory for the report and annotations
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Write the JSON report
    #[arg(long)]
    pub save_report: bool,

    /// Write per-frame overlay annotations
    #[arg(long)]
    pub save_annotations: bool,

    /// Frame size as WIDTHxHEIGHT; skips probing the video
    #[arg(long)]
    pub frame_size: Option<FrameSize>,

    /// Minimum detection confidence
    #[arg(long)]
    pub confidence_threshold: Option<f64>,

    /// Objects need more than this many frames to be reported
    #[arg(long)]
    pub retain_above_frames: Option<u64>,

    /// Samples averaged at each end of a trajectory
    #[arg(long)]
    pub window: Option<usize>,

    /// Use floor-division box midpoints
    #[arg(long)]
    pub legacy_midpoint: bool,
}

impl Args {
    /// Layer command line flags over a base config.
    pub fn apply(&self, mut config: TrackerConfig) -> TrackerConfig {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(threshold) = self.confidence_threshold {
            config.aggregator.confidence_threshold = threshold;
        }
        if let Some(frames) = self.retain_above_frames {
            config.aggregator.retain_above_frames = frames;
        }
        if let Some(window) = self.window {
            config.aggregator.window_size = window;
        }
        if self.legacy_midpoint {
            config.aggregator.midpoint = Midpoint::Floor;
        }
        config.save_report |= self.save_report;
        config.save_annotations |= self.save_annotations;
        if self.frame_size.is_some() {
            config.frame_size = self.frame_size;
        }
        config
    }
}
