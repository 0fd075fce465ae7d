//! Runner configuration.

use std::path::PathBuf;
use std::str::FromStr;

use trackstat_core::config::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_RETAIN_ABOVE_FRAMES, DEFAULT_WINDOW_SIZE,
};
use trackstat_core::AggregatorConfig;
use trackstat_models::Midpoint;

/// Frame size given on the command line as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FromStr for FrameSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width = w.trim().parse().map_err(|_| format!("invalid width '{w}'"))?;
        let height = h.trim().parse().map_err(|_| format!("invalid height '{h}'"))?;
        Ok(Self { width, height })
    }
}

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Aggregation parameters
    pub aggregator: AggregatorConfig,
    /// Directory reports and annotations are written to
    pub output_dir: PathBuf,
    /// Write the JSON report
    pub save_report: bool,
    /// Write per-frame overlay annotations
    pub save_annotations: bool,
    /// Skip probing and use this frame size
    pub frame_size: Option<FrameSize>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            aggregator: AggregatorConfig::default(),
            output_dir: PathBuf::from("."),
            save_report: false,
            save_annotations: false,
            frame_size: None,
        }
    }
}

impl TrackerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let legacy = lookup("TRACKSTAT_LEGACY_MIDPOINT")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            aggregator: AggregatorConfig {
                confidence_threshold: lookup("TRACKSTAT_CONFIDENCE_THRESHOLD")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
                retain_above_frames: lookup("TRACKSTAT_RETAIN_ABOVE_FRAMES")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_RETAIN_ABOVE_FRAMES),
                window_size: lookup("TRACKSTAT_WINDOW")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_WINDOW_SIZE),
                midpoint: if legacy {
                    Midpoint::Floor
                } else {
                    Midpoint::Exact
                },
            },
            output_dir: lookup("TRACKSTAT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            save_report: false,
            save_annotations: false,
            frame_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = TrackerConfig::from_lookup(|_| None);
        assert_eq!(config.aggregator, AggregatorConfig::default());
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(!config.save_report);
    }

    #[test]
    fn test_env_overrides() {
        let config = TrackerConfig::from_lookup(lookup_from(&[
            ("TRACKSTAT_CONFIDENCE_THRESHOLD", "0.6"),
            ("TRACKSTAT_RETAIN_ABOVE_FRAMES", "10"),
            ("TRACKSTAT_WINDOW", "3"),
            ("TRACKSTAT_LEGACY_MIDPOINT", "true"),
            ("TRACKSTAT_OUTPUT_DIR", "/tmp/out"),
        ]));
        assert_eq!(config.aggregator.confidence_threshold, 0.6);
        assert_eq!(config.aggregator.retain_above_frames, 10);
        assert_eq!(config.aggregator.window_size, 3);
        assert_eq!(config.aggregator.midpoint, Midpoint::Floor);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = TrackerConfig::from_lookup(lookup_from(&[
            ("TRACKSTAT_RETAIN_ABOVE_FRAMES", "lots"),
            ("TRACKSTAT_LEGACY_MIDPOINT", "nope"),
        ]));
        assert_eq!(config.aggregator.retain_above_frames, DEFAULT_RETAIN_ABOVE_FRAMES);
        assert_eq!(config.aggregator.midpoint, Midpoint::Exact);
    }

    #[test]
    fn test_parse_frame_size() {
        assert_eq!(
            "1920x1080".parse::<FrameSize>(),
            Ok(FrameSize {
                width: 1920,
                height: 1080
            })
        );
        assert!("1920".parse::<FrameSize>().is_err());
        assert!("wide x 10".parse::<FrameSize>().is_err());
    }
}
