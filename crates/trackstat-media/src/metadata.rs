//! Creation timestamp extraction via exiftool.
//!
//! Failures here never block a report: every helper degrades to `None`
//! and logs a warning.

use chrono::NaiveDateTime;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::warn;
use trackstat_models::SourceVideoInfo;

/// Timestamp layout exiftool uses for `CreateDate`.
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Timestamp layout written to reports.
const REPORT_DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Run `exiftool -CreateDate` on a file and return its trimmed output.
pub async fn get_video_creation_time(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();

    if which::which("exiftool").is_err() {
        warn!("exiftool not found in PATH, creation date unavailable");
        return None;
    }

    let output = Command::new("exiftool")
        .arg("-CreateDate")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    match output {
        Ok(output) => Some(String::from_utf8_lossy(&output.stdout).trim().to_string()),
        Err(e) => {
            warn!(path = %path.display(), "Error getting creation date: {}", e);
            None
        }
    }
}

/// Convert `Create Date : YYYY:MM:DD HH:MM:SS` into `DD-MM-YYYY HH:MM:SS`.
pub fn convert_create_date(exif_output: &str) -> Option<String> {
    let date_string = exif_output
        .split_once(':')
        .map_or(exif_output, |(_, rest)| rest)
        .trim();

    match NaiveDateTime::parse_from_str(date_string, EXIF_DATE_FORMAT) {
        Ok(date) => Some(date.format(REPORT_DATE_FORMAT).to_string()),
        Err(e) => {
            warn!(raw = %exif_output, "Error processing date: {}", e);
            None
        }
    }
}

/// Gather the provenance table for an original recording.
pub async fn read_source_info(original_video_path: impl AsRef<Path>) -> SourceVideoInfo {
    let path = original_video_path.as_ref();
    let creation_date = get_video_creation_time(path)
        .await
        .and_then(|raw| convert_create_date(&raw));

    SourceVideoInfo {
        original_video_path: path.display().to_string(),
        creation_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_exiftool_line() {
        assert_eq!(
            convert_create_date("Create Date                     : 2023:07:14 09:05:33"),
            Some("14-07-2023 09:05:33".to_string())
        );
    }

    #[test]
    fn test_convert_rejects_garbage() {
        assert_eq!(convert_create_date(""), None);
        assert_eq!(convert_create_date("Create Date : 0000:00:00 00:00:00"), None);
        assert_eq!(convert_create_date("no date here"), None);
    }

    #[test]
    fn test_missing_file_has_no_creation_date() {
        let info = tokio_test::block_on(read_source_info("/definitely/not/here.MOV"));
        assert_eq!(info.original_video_path, "/definitely/not/here.MOV");
        assert_eq!(info.creation_date, None);
    }
}
