//! JSON Lines detection dump reader.
//!
//! Each non-blank line holds one frame of tracker output:
//!
//! ```json
//! {"frame": 12, "detections": [{"id": 7, "bbox": [10.0, 20.0, 50.0, 80.0], "conf": 0.91}]}
//! ```
//!
//! `frame` is informational; frames are fed in line order. An element of
//! `detections` that cannot be read as a detection at all is dropped here
//! and counted; one that parses but is incomplete (no id, short bbox) is
//! passed on and screened by the aggregator.

use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};
use trackstat_core::FrameDetectionSource;
use trackstat_models::RawDetection;

use crate::error::{MediaError, MediaResult};

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    frame: Option<u64>,
    #[serde(default)]
    detections: Vec<serde_json::Value>,
}

/// Frame source backed by a JSON Lines tracker dump.
pub struct JsonLinesSource<R> {
    reader: R,
    name: String,
    line_number: usize,
    frames_read: u64,
    dropped: u64,
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a dump file.
    pub fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Wrap any buffered reader.
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            line_number: 0,
            frames_read: 0,
            dropped: 0,
        }
    }

    /// Frames yielded so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn read_record(&mut self) -> MediaResult<Option<FrameRecord>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            return serde_json::from_str(&line)
                .map(Some)
                .map_err(|e| MediaError::source_error(self.line_number, e.to_string()));
        }
    }
}

impl<R: BufRead> FrameDetectionSource for JsonLinesSource<R> {
    type Error = MediaError;

    fn next_frame(&mut self) -> MediaResult<Option<Vec<RawDetection>>> {
        let Some(record) = self.read_record()? else {
            return Ok(None);
        };
        self.frames_read += 1;

        if let Some(frame) = record.frame {
            if frame != self.frames_read {
                debug!(
                    line = self.line_number,
                    frame,
                    position = self.frames_read,
                    "Dump frame number differs from feed position"
                );
            }
        }

        let mut detections = Vec::with_capacity(record.detections.len());
        for value in record.detections {
            match serde_json::from_value::<RawDetection>(value) {
                Ok(raw) => detections.push(raw),
                Err(e) => {
                    self.dropped += 1;
                    warn!(line = self.line_number, "Dropping unreadable detection: {}", e);
                }
            }
        }

        Ok(Some(detections))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn dropped_detections(&self) -> u64 {
        self.dropped
    }
}
