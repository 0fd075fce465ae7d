//! Closer/further classification of a distance history.

use trackstat_models::MovementVerdict;

/// Verdict for one object plus the two window means it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub verdict: MovementVerdict,
    pub first_mean: f64,
    pub last_mean: f64,
}

/// Mean of a non-empty slice.
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Classify a distance history by comparing its opening and closing windows.
///
/// Both windows hold `min(window, n)` samples, so short histories share
/// samples between the two. The comparison is strict: equal means give
/// [`MovementVerdict::Further`]. Returns `None` for an empty history.
pub fn classify_movement(distances: &[f64], window: usize) -> Option<Classification> {
    if distances.is_empty() || window == 0 {
        return None;
    }

    let n = window.min(distances.len());
    let first_mean = mean(&distances[..n]);
    let last_mean = mean(&distances[distances.len() - n..]);

    let verdict = if last_mean < first_mean {
        MovementVerdict::Closer
    } else {
        MovementVerdict::Further
    };

    Some(Classification {
        verdict,
        first_mean,
        last_mean,
    })
}
