//! Threshold-crossing probabilities

use serde::Serialize;

use crate::models::{Direction, Hazard, Sample, ThresholdSet};

use super::heat_index::discomfort_probability;

/// Share of present values on the hazardous side of a threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityResult {
    /// 0-100; 0 when `total` is 0
    pub percentage: f64,
    /// Values past the threshold
    pub count: usize,
    /// Present values considered
    pub total: usize,
}

impl ProbabilityResult {
    /// Result for an empty sample
    pub const EMPTY: ProbabilityResult = ProbabilityResult {
        percentage: 0.0,
        count: 0,
        total: 0,
    };

    /// Build from raw counts, guarding the zero denominator
    #[must_use]
    pub fn from_counts(count: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            100.0 * count as f64 / total as f64
        };
        Self {
            percentage,
            count,
            total,
        }
    }
}

/// Probability that a value lies strictly beyond `threshold`.
///
/// Absent (`None`) and non-finite values are excluded from both the count
/// and the total.
pub fn probability_of<I>(values: I, threshold: f64, direction: Direction) -> ProbabilityResult
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (count, total) = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0usize, 0usize), |(count, total), value| {
            let hit = usize::from(direction.exceeds(value, threshold));
            (count + hit, total + 1)
        });
    ProbabilityResult::from_counts(count, total)
}

/// Probability of `hazard` over `sample` with the thresholds from `thresholds`
#[must_use]
pub fn hazard_probability(
    sample: &Sample,
    hazard: Hazard,
    thresholds: &ThresholdSet,
) -> ProbabilityResult {
    let threshold = thresholds.get(hazard);
    match hazard.metric() {
        Some(metric) => probability_of(sample.values(metric), threshold, hazard.direction()),
        None => discomfort_probability(sample, threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyRecord;
    use chrono::NaiveDate;

    fn present(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_strict_above() {
        let values = present(&[30.0, 31.0, 33.0, 35.0, 29.0, 34.0, 36.0, 28.0, 32.0, 31.0]);
        let result = probability_of(values, 32.0, Direction::Above);
        assert_eq!(result.count, 4);
        assert_eq!(result.total, 10);
        assert!((result.percentage - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_below() {
        let result = probability_of(present(&[-2.0, 0.0, 1.0, -0.5]), 0.0, Direction::Below);
        assert_eq!(result.count, 2);
        assert_eq!(result.total, 4);
        assert!((result.percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_is_zero() {
        let result = probability_of(Vec::new(), 10.0, Direction::Above);
        assert_eq!(result, ProbabilityResult::EMPTY);
    }

    #[test]
    fn test_absent_values_excluded_from_total() {
        let values = vec![Some(12.0), None, Some(0.0), None, Some(f64::NAN)];
        let result = probability_of(values, 10.0, Direction::Above);
        assert_eq!(result.count, 1);
        assert_eq!(result.total, 2);
        assert!((result.percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_hazard_probability_uses_mapped_metric() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2020, 1, d).unwrap();
        let sample = Sample::new(vec![
            DailyRecord {
                temperature_min: Some(-3.0),
                temperature_max: Some(4.0),
                ..DailyRecord::empty(day(1))
            },
            DailyRecord {
                temperature_min: Some(2.0),
                temperature_max: Some(9.0),
                ..DailyRecord::empty(day(2))
            },
        ]);
        let result = hazard_probability(&sample, Hazard::VeryCold, &ThresholdSet::default());
        assert_eq!(result.count, 1);
        assert_eq!(result.total, 2);
    }
}
