//! Normal-approximation confidence intervals for probabilities

use serde::Serialize;

/// z-score of a two-sided 95% interval
pub const Z_95: f64 = 1.96;

/// Interval bounds in percent, clamped to 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub const EMPTY: ConfidenceInterval = ConfidenceInterval {
        lower: 0.0,
        upper: 0.0,
    };

    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// 95% interval around `percentage` observed over `sample_size` values.
///
/// Returns `{0, 0}` for an empty sample.
#[must_use]
pub fn confidence_interval(percentage: f64, sample_size: usize) -> ConfidenceInterval {
    if sample_size == 0 || !percentage.is_finite() {
        return ConfidenceInterval::EMPTY;
    }
    let percentage = percentage.clamp(0.0, 100.0);
    let p = percentage / 100.0;
    let margin = Z_95 * (p * (1.0 - p) / sample_size as f64).sqrt() * 100.0;

    ConfidenceInterval {
        lower: (percentage - margin).clamp(0.0, 100.0),
        upper: (percentage + margin).clamp(0.0, 100.0),
    }
}
