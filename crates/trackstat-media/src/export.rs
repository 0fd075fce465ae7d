//! Report and annotation export.
//!
//! # Report schema
//! ```json
//! {
//!   "version": "1.0",
//!   "video": "masked_GX0101.mov",
//!   "report": {
//!     "frame_summaries": [{"frame_number": 1, "unique_object_count": 2}],
//!     "movements": [{"object_id": 7, "frame_count": 40, "verdict": "Closer", ...}],
//!     "proportions": {"closer": 1.0, "further": 0.0},
//!     "average_unique_objects_per_frame": 2.0,
//!     "total_retained_frames": 40
//!   },
//!   "source": {"original_video_path": "GX0101.MOV", "creation_date": "14-07-2023 09:05:33"}
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use trackstat_models::{BoundingBox, Detection, ObjectId, SourceVideoInfo, TrackingReport};

use crate::error::MediaResult;

/// Schema version for compatibility checking.
pub const REPORT_VERSION: &str = "1.0";

/// Everything written for one analysed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Schema version
    pub version: String,
    /// Analysed video file name
    pub video: String,
    /// Tables produced by the aggregator
    pub report: TrackingReport,
    /// Provenance of the original recording
    pub source: SourceVideoInfo,
}

impl ReportDocument {
    pub fn new(video: impl Into<String>, report: TrackingReport, source: SourceVideoInfo) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            video: video.into(),
            report,
            source,
        }
    }
}

/// Report exporter.
pub struct ReportExporter;

impl ReportExporter {
    /// Export a report document to pretty JSON.
    pub fn to_json(document: &ReportDocument) -> serde_json::Result<String> {
        serde_json::to_string_pretty(document)
    }

    /// Write a report document, creating parent directories as needed.
    pub fn write_report<P: AsRef<Path>>(document: &ReportDocument, path: P) -> MediaResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = Self::to_json(document)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        info!("Results have been saved to {}", path.display());
        Ok(())
    }

    /// Read a previously written report document.
    pub fn read_report<P: AsRef<Path>>(path: P) -> MediaResult<ReportDocument> {
        let data = std::fs::read(path.as_ref())?;
        Ok(serde_json::from_slice(&data)?)
    }
}

/// One overlay box in the annotation stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationBox {
    pub id: ObjectId,
    pub bbox: BoundingBox,
    pub confidence: f64,
    pub label: String,
}

impl From<&Detection> for AnnotationBox {
    fn from(detection: &Detection) -> Self {
        Self {
            id: detection.object_id,
            bbox: detection.bbox,
            confidence: detection.confidence,
            label: detection.label(),
        }
    }
}

/// Annotations for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnnotations {
    pub frame: u64,
    pub boxes: Vec<AnnotationBox>,
}

/// Streams accepted detections to a JSON Lines file for overlay rendering.
pub struct AnnotationWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    frames_written: u64,
}

impl AnnotationWriter {
    /// Create the annotation file, truncating any previous one.
    pub fn create(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(&path)?);
        Ok(Self {
            writer,
            path,
            frames_written: 0,
        })
    }

    /// Append one frame of accepted detections.
    pub fn write_frame(&mut self, frame: u64, detections: &[Detection]) -> MediaResult<()> {
        let record = FrameAnnotations {
            frame,
            boxes: detections.iter().map(AnnotationBox::from).collect(),
        };
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Flush and close the file.
    pub fn finish(mut self) -> MediaResult<PathBuf> {
        self.writer.flush()?;
        info!(
            frames = self.frames_written,
            "Annotated detections have been saved to {}",
            self.path.display()
        );
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackstat_models::{FrameSummary, MovementProportions, MovementVerdict, ObjectMovement};

    fn sample_report() -> TrackingReport {
        TrackingReport {
            frame_summaries: vec![FrameSummary::new(1, 1), FrameSummary::new(2, 0)],
            movements: vec![ObjectMovement {
                object_id: 7,
                frame_count: 40,
                verdict: MovementVerdict::Closer,
                first_window_mean: 100.0,
                last_window_mean: 10.0,
            }],
            proportions: MovementProportions {
                closer: 1.0,
                further: 0.0,
            },
            average_unique_objects_per_frame: Some(0.5),
            total_retained_frames: 40,
        }
    }

    fn sample_source() -> SourceVideoInfo {
        SourceVideoInfo {
            original_video_path: "/data/GX0101.MOV".to_string(),
            creation_date: None,
        }
    }

    #[test]
    fn test_report_json_has_five_tables() {
        let doc = ReportDocument::new("masked_GX0101.mov", sample_report(), sample_source());
        let value: serde_json::Value =
            serde_json::from_str(&ReportExporter::to_json(&doc).unwrap()).unwrap();

        assert_eq!(value["version"], REPORT_VERSION);
        assert_eq!(value["report"]["frame_summaries"].as_array().unwrap().len(), 2);
        assert_eq!(value["report"]["movements"][0]["verdict"], "Closer");
        assert_eq!(value["report"]["proportions"]["closer"], 1.0);
        assert_eq!(value["report"]["average_unique_objects_per_frame"], 0.5);
        assert!(value["source"]["creation_date"].is_null());
    }

    #[test]
    fn test_write_and_read_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        let doc = ReportDocument::new("v.mov", sample_report(), sample_source());

        ReportExporter::write_report(&doc, &path).unwrap();
        assert_eq!(ReportExporter::read_report(&path).unwrap(), doc);
    }

    #[test]
    fn test_annotation_writer_emits_one_line_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.jsonl");

        let det = Detection::new(4, BoundingBox::new(1.0, 2.0, 3.0, 4.0), 0.75);
        let mut writer = AnnotationWriter::create(&path).unwrap();
        writer.write_frame(1, &[det]).unwrap();
        writer.write_frame(2, &[]).unwrap();
        assert_eq!(writer.frames_written(), 2);
        writer.finish().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<FrameAnnotations> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].boxes[0].label, "ID 4 Conf: 0.75");
        assert!(lines[1].boxes.is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_full_disk_is_an_io_error() {
        use crate::error::MediaError;

        let det = Detection::new(4, BoundingBox::new(1.0, 2.0, 3.0, 4.0), 0.75);
        let mut writer = AnnotationWriter::create("/dev/full").unwrap();

        let err = (1..=1000)
            .find_map(|frame| writer.write_frame(frame, &[det]).err())
            .unwrap();
        assert!(matches!(err, MediaError::Io(_)), "got {err:?}");
    }
}
