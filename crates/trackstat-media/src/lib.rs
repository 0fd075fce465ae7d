#![deny(unreachable_patterns)]
//! Video probing, metadata and report export for trackstat.
//!
//! This crate provides:
//! - FFprobe frame size and rate lookup (the frame center comes from here)
//! - Creation timestamp extraction via exiftool
//! - A JSON Lines reader for tracker detection dumps
//! - Report and overlay annotation writers
//! - Output path derivation

pub mod error;
pub mod export;
pub mod metadata;
pub mod paths;
pub mod probe;
pub mod source;

pub use error::{MediaError, MediaResult};
pub use export::{AnnotationWriter, FrameAnnotations, ReportDocument, ReportExporter};
pub use metadata::{convert_create_date, get_video_creation_time, read_source_info};
pub use paths::OutputPaths;
pub use probe::{probe_video, VideoInfo};
pub use source::JsonLinesSource;
