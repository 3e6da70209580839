//! Distributional statistics over a numeric sample
//!
//! Percentiles (and the median) use linear interpolation between order
//! statistics at rank `p / 100 × (N − 1)`. Standard deviation is the
//! population form (divide by N).

use serde::Serialize;

use crate::models::{Metric, Sample};

/// Tukey fence multiplier for outlier detection
const IQR_FENCE: f64 = 1.5;

/// Percentiles reported alongside the summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

/// Summary of a non-empty sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    pub percentiles: Percentiles,
    /// Values beyond 1.5 × IQR from the quartiles, in ascending order
    pub outliers: Vec<f64>,
}

impl Statistics {
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Summarise `values`; non-finite entries are ignored.
///
/// Returns `None` when nothing is left to summarise.
#[must_use]
pub fn summarize(values: &[f64]) -> Option<Statistics> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let n = count as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let q1 = percentile_of_sorted(&sorted, 25.0);
    let q3 = percentile_of_sorted(&sorted, 75.0);
    let iqr = q3 - q1;
    let (low_fence, high_fence) = (q1 - IQR_FENCE * iqr, q3 + IQR_FENCE * iqr);

    Some(Statistics {
        count,
        mean,
        median: percentile_of_sorted(&sorted, 50.0),
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
        q1,
        q3,
        percentiles: Percentiles {
            p10: percentile_of_sorted(&sorted, 10.0),
            p25: q1,
            p75: q3,
            p90: percentile_of_sorted(&sorted, 90.0),
            p95: percentile_of_sorted(&sorted, 95.0),
        },
        outliers: sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect(),
    })
}

/// Arithmetic mean; `None` for an empty input
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Summarise the present values of `metric`
#[must_use]
pub fn summarize_metric(sample: &Sample, metric: Metric) -> Option<Statistics> {
    summarize(&sample.present_values(metric))
}

/// Percentile `p` (0-100) of `values`; `None` for an empty input
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    Some(percentile_of_sorted(&sorted, p))
}

/// `sorted` must be non-empty and ascending
fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let rank = (p.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    let (low, high) = (sorted[lower], sorted[upper.min(last)]);
    // rounding must not push the result outside its bracket
    (low + (high - low) * fraction).clamp(low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_sample_has_no_statistics() {
        assert_eq!(summarize(&[]), None);
        assert_eq!(summarize(&[f64::NAN]), None);
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_single_value() {
        let stats = summarize(&[4.2]).unwrap();
        assert_eq!(stats.count, 1);
        assert!(approx(stats.mean, 4.2));
        assert!(approx(stats.median, 4.2));
        assert!(approx(stats.std_dev, 0.0));
        assert!(approx(stats.percentiles.p95, 4.2));
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_basic_summary() {
        let stats = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(approx(stats.mean, 5.0));
        // population standard deviation of the textbook example
        assert!(approx(stats.std_dev, 2.0));
        assert!(approx(stats.median, 4.5));
        assert!(approx(stats.min, 2.0));
        assert!(approx(stats.max, 9.0));
    }

    #[rstest]
    #[case(0.0, 10.0)]
    #[case(25.0, 17.5)]
    #[case(50.0, 25.0)]
    #[case(90.0, 37.0)]
    #[case(100.0, 40.0)]
    fn test_percentile_interpolation(#[case] p: f64, #[case] expected: f64) {
        let values = [40.0, 10.0, 30.0, 20.0];
        assert!(approx(percentile(&values, p).unwrap(), expected));
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert!(approx(mean(&[1.0, 2.0, 6.0]).unwrap(), 3.0));
    }

    #[test]
    fn test_even_length_median_interpolates() {
        let stats = summarize(&[1.0, 2.0, 3.0, 10.0]).unwrap();
        assert!(approx(stats.median, 2.5));
    }

    #[test]
    fn test_iqr_outliers() {
        let stats = summarize(&[10.0, 11.0, 12.0, 12.0, 13.0, 14.0, 60.0, -30.0]).unwrap();
        assert_eq!(stats.outliers, vec![-30.0, 60.0]);
        assert!(stats.iqr() > 0.0);
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let stats = summarize(&[1.0, f64::NAN, 3.0, f64::INFINITY]).unwrap();
        assert_eq!(stats.count, 2);
        assert!(approx(stats.mean, 2.0));
    }
}
