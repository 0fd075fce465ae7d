//! Aggregator configuration.

use trackstat_models::Midpoint;

use crate::error::{CoreError, CoreResult};

/// Default minimum confidence for a detection to count.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Objects seen in this many frames or fewer are left out of movement statistics.
pub const DEFAULT_RETAIN_ABOVE_FRAMES: u64 = 30;

/// Number of samples averaged at each end of a distance history.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Trajectory aggregator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorConfig {
    /// Detections below this confidence are ignored entirely
    pub confidence_threshold: f64,
    /// Objects need strictly more frames than this to be retained
    pub retain_above_frames: u64,
    /// Averaging window at the start and end of each history
    pub window_size: usize,
    /// Bounding box midpoint rule
    pub midpoint: Midpoint,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            retain_above_frames: DEFAULT_RETAIN_ABOVE_FRAMES,
            window_size: DEFAULT_WINDOW_SIZE,
            midpoint: Midpoint::Exact,
        }
    }
}

impl AggregatorConfig {
    /// Config reproducing legacy reports bit-for-bit.
    pub fn legacy() -> Self {
        Self {
            midpoint: Midpoint::Floor,
            ..Self::default()
        }
    }

    /// Check the config is usable.
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(CoreError::invalid_config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.window_size == 0 {
            return Err(CoreError::invalid_config("window_size must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AggregatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.retain_above_frames, 30);
        assert_eq!(config.window_size, 5);
        assert_eq!(config.midpoint, Midpoint::Exact);
    }

    #[test]
    fn test_legacy_config_uses_floor_midpoint() {
        assert_eq!(AggregatorConfig::legacy().midpoint, Midpoint::Floor);
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        for threshold in [-0.1, 1.5, f64::NAN] {
            let config = AggregatorConfig {
                confidence_threshold: threshold,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "threshold {threshold} accepted");
        }
    }

    #[test]
    fn test_rejects_zero_window() {
        let config = AggregatorConfig {
            window_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }
}
