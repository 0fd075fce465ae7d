//! Command line runner for trackstat.
//!
//! Wires a tracker detection dump and its video through the trajectory
//! aggregator and writes the resulting report.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod processor;

pub use cli::Args;
pub use config::{FrameSize, TrackerConfig};
pub use error::{CliError, CliResult};
pub use logging::VideoLogger;
pub use processor::{analyze_video, run_feed, AnalysisOutput, FeedEnd, FeedOutcome};
