//! Long-term trends
//!
//! Two views are offered: an ordinary least squares fit over yearly means
//! of a metric, and a decade-over-decade comparison of a hazard's
//! probability.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::models::{Hazard, Metric, Sample, ThresholdSet};

use super::probability::{ProbabilityResult, hazard_probability};
use super::stats::mean;

/// Change above which a decade-over-decade shift is significant, in percent
const SIGNIFICANT_CHANGE_PCT: f64 = 15.0;
/// Change above which a decade-over-decade shift is reported at all
const NOTABLE_CHANGE_PCT: f64 = 5.0;

/// Least squares line `y = slope × x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

/// Closed-form ordinary least squares over paired `xs` and `ys`.
///
/// Pairs with a non-finite member are skipped. Fewer than two points or no
/// spread in `xs` yields a flat line through the mean of `ys`.
#[must_use]
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Regression {
    let points: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (*x, *y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    if points.is_empty() {
        return Regression {
            slope: 0.0,
            intercept: 0.0,
        };
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let flat = Regression {
        slope: 0.0,
        intercept: mean_y,
    };

    let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), (x, y)| {
        let dx = x - mean_x;
        (sxx + dx * dx, sxy + dx * (y - mean_y))
    });
    if points.len() < 2 || sxx <= f64::EPSILON {
        return flat;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if slope.is_finite() && intercept.is_finite() {
        Regression { slope, intercept }
    } else {
        flat
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMagnitude {
    Significant,
    Minimal,
}

/// Regression trend of a metric's yearly mean
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyTrend {
    pub metric: Metric,
    /// Units per year
    pub slope: f64,
    pub intercept: f64,
    pub direction: TrendDirection,
    pub magnitude: TrendMagnitude,
    /// Distinct years with at least one present value
    pub years: usize,
    /// Recent-decade mean relative to the older-decade mean, in percent
    pub change_percent: f64,
}

/// Mean of `metric` per season, ascending by year
#[must_use]
pub fn yearly_means(sample: &Sample, metric: Metric) -> Vec<(i32, f64)> {
    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for record in sample.records() {
        if let Some(value) = record.value(metric).filter(|v| v.is_finite()) {
            let entry = sums.entry(sample.season_of(record)).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(year, (sum, n))| (year, sum / n as f64))
        .collect()
}

/// Fit a line through the yearly means of `metric`.
///
/// `significance_slope` is the absolute slope (units per year) above which
/// the trend is reported as significant.
#[must_use]
pub fn yearly_trend(
    sample: &Sample,
    metric: Metric,
    significance_slope: f64,
    reference_year: i32,
    decade_years: u32,
) -> YearlyTrend {
    let means = yearly_means(sample, metric);
    let xs: Vec<f64> = means.iter().map(|(year, _)| f64::from(*year)).collect();
    let ys: Vec<f64> = means.iter().map(|(_, mean)| *mean).collect();
    let Regression { slope, intercept } = linear_regression(&xs, &ys);

    let direction = if slope > f64::EPSILON {
        TrendDirection::Increasing
    } else if slope < -f64::EPSILON {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };
    let magnitude = if slope.abs() > significance_slope {
        TrendMagnitude::Significant
    } else {
        TrendMagnitude::Minimal
    };

    let (recent, older) = split_decades(sample, reference_year, decade_years);
    let change_percent = match (
        mean(&recent.present_values(metric)),
        mean(&older.present_values(metric)),
    ) {
        (Some(recent), Some(older)) => percent_change(recent, older),
        _ => 0.0,
    };

    YearlyTrend {
        metric,
        slope,
        intercept,
        direction,
        magnitude,
        years: means.len(),
        change_percent,
    }
}

/// Five-way classification of a decade-over-decade change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateTrendClass {
    SignificantlyIncreasing,
    Increasing,
    Stable,
    Decreasing,
    SignificantlyDecreasing,
}

impl ClimateTrendClass {
    #[must_use]
    pub fn classify(change_percent: f64) -> Self {
        match change_percent {
            c if c > SIGNIFICANT_CHANGE_PCT => Self::SignificantlyIncreasing,
            c if c > NOTABLE_CHANGE_PCT => Self::Increasing,
            c if c < -SIGNIFICANT_CHANGE_PCT => Self::SignificantlyDecreasing,
            c if c < -NOTABLE_CHANGE_PCT => Self::Decreasing,
            _ => Self::Stable,
        }
    }

    #[must_use]
    pub fn direction(self) -> TrendDirection {
        match self {
            Self::SignificantlyIncreasing | Self::Increasing => TrendDirection::Increasing,
            Self::SignificantlyDecreasing | Self::Decreasing => TrendDirection::Decreasing,
            Self::Stable => TrendDirection::Stable,
        }
    }
}

impl fmt::Display for ClimateTrendClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignificantlyIncreasing => write!(f, "Significantly increasing"),
            Self::Increasing => write!(f, "Increasing"),
            Self::Stable => write!(f, "Stable"),
            Self::Decreasing => write!(f, "Decreasing"),
            Self::SignificantlyDecreasing => write!(f, "Significantly decreasing"),
        }
    }
}

/// Probability of a hazard in the recent decade against the decade before
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimateTrend {
    pub recent: ProbabilityResult,
    pub older: ProbabilityResult,
    /// `100 × (recent − older) / older`; 0 when the older probability is 0
    pub change_percent: f64,
    pub classification: ClimateTrendClass,
}

impl ClimateTrend {
    const STABLE_EMPTY: ClimateTrend = ClimateTrend {
        recent: ProbabilityResult::EMPTY,
        older: ProbabilityResult::EMPTY,
        change_percent: 0.0,
        classification: ClimateTrendClass::Stable,
    };

    #[must_use]
    pub fn direction(&self) -> TrendDirection {
        self.classification.direction()
    }
}

/// Split into (recent, older): seasons aged `0..decade` and `decade..2×decade`
/// years before `reference_year`. Seasons after `reference_year` are ignored.
#[must_use]
pub fn split_decades(
    sample: &Sample,
    reference_year: i32,
    decade_years: u32,
) -> (Sample, Sample) {
    let decade = i64::from(decade_years);
    let age = |year: i32| i64::from(reference_year) - i64::from(year);
    let recent = sample.filter_years(|year| (0..decade).contains(&age(year)));
    let older = sample.filter_years(|year| (decade..2 * decade).contains(&age(year)));
    (recent, older)
}

/// Compare `probability` on the recent decade against the older one.
///
/// Either decade being empty gives a stable, zero-change result.
pub fn climate_trend<F>(
    sample: &Sample,
    reference_year: i32,
    decade_years: u32,
    probability: F,
) -> ClimateTrend
where
    F: Fn(&Sample) -> ProbabilityResult,
{
    let (recent_sample, older_sample) = split_decades(sample, reference_year, decade_years);
    let recent = probability(&recent_sample);
    let older = probability(&older_sample);

    if recent.total == 0 || older.total == 0 {
        return ClimateTrend {
            recent,
            older,
            ..ClimateTrend::STABLE_EMPTY
        };
    }

    let change_percent = if older.percentage == 0.0 {
        0.0
    } else {
        100.0 * (recent.percentage - older.percentage) / older.percentage
    };

    ClimateTrend {
        recent,
        older,
        change_percent,
        classification: ClimateTrendClass::classify(change_percent),
    }
}

/// Decade-over-decade trend of one hazard
#[must_use]
pub fn hazard_climate_trend(
    sample: &Sample,
    hazard: Hazard,
    thresholds: &ThresholdSet,
    reference_year: i32,
    decade_years: u32,
) -> ClimateTrend {
    climate_trend(sample, reference_year, decade_years, |part| {
        hazard_probability(part, hazard, thresholds)
    })
}

fn percent_change(recent: f64, older: f64) -> f64 {
    if older.abs() <= f64::EPSILON {
        0.0
    } else {
        100.0 * (recent - older) / older.abs()
    }
}
