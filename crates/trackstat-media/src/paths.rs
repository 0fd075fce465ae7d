//! Output path derivation.

use std::path::{Path, PathBuf};

/// Prefix the masking step adds to recordings.
const MASKED_PREFIX: &str = "masked_";

/// Files produced for one analysed video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Video name up to its first `.`
    pub stem: String,
    /// JSON report with all five tables
    pub report: PathBuf,
    /// Per-frame overlay annotations
    pub annotations: PathBuf,
    /// Unmasked recording the analysed video was derived from
    pub original_video: PathBuf,
}

impl OutputPaths {
    /// Derive output locations for `video_path` under `output_dir`.
    pub fn derive(video_path: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        let video_path = video_path.as_ref();
        let output_dir = output_dir.as_ref();

        let video_name = video_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = video_name
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();

        let original_name = video_name.replace(MASKED_PREFIX, "").replace(".mov", ".MOV");
        let original_video = video_path
            .parent()
            .map(|dir| dir.join(&original_name))
            .unwrap_or_else(|| PathBuf::from(&original_name));

        Self {
            report: output_dir.join(format!("{stem}_object_tracking_results.json")),
            annotations: output_dir.join(format!("{stem}_detections.jsonl")),
            original_video,
            stem,
        }
    }
}
