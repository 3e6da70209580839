//! Aggregated climate report for one sample
//!
//! Runs the probability, confidence, statistics and trend modules over a
//! normalised sample and gathers the results into a single serialisable
//! value for the caller.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, WeatherOddsError};
use crate::models::{Direction, Hazard, Metric, Sample, TargetDate, ThresholdSet};

use super::confidence::{ConfidenceInterval, confidence_interval};
use super::probability::{ProbabilityResult, hazard_probability};
use super::stats::{Statistics, summarize_metric};
use super::trend::{ClimateTrend, YearlyTrend, hazard_climate_trend, yearly_trend};

/// Tunable analysis policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisPolicy {
    /// Days either side of the target date
    pub window_days: u32,
    /// Seasons of history, ending with the reference year
    pub years_back: u32,
    /// Distinct years below which results are flagged as low reliability
    pub min_sample_years: usize,
    /// Absolute yearly slope above which a metric trend is significant
    pub significance_slope: f64,
    /// Length of the periods compared by the climate trend
    pub decade_years: u32,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            window_days: 7,
            years_back: 20,
            min_sample_years: 5,
            significance_slope: 0.1,
            decade_years: 10,
        }
    }
}

impl AnalysisPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.window_days > 60 {
            return Err(WeatherOddsError::validation(
                "window_days cannot exceed 60 days",
            ));
        }
        if !(1..=100).contains(&self.years_back) {
            return Err(WeatherOddsError::validation(
                "years_back must be between 1 and 100",
            ));
        }
        if self.decade_years == 0 {
            return Err(WeatherOddsError::validation(
                "decade_years must be at least 1",
            ));
        }
        if !self.significance_slope.is_finite() || self.significance_slope < 0.0 {
            return Err(WeatherOddsError::validation(
                "significance_slope must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// How far the report can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    /// The sample was empty
    NoData,
    /// Fewer distinct years than the policy minimum
    Low,
    Adequate,
}

/// Odds of one hazard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardOdds {
    pub hazard: Hazard,
    pub threshold: f64,
    pub direction: Direction,
    pub probability: ProbabilityResult,
    pub confidence: ConfidenceInterval,
    pub climate_trend: ClimateTrend,
}

/// Distribution and long-term trend of one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: Metric,
    /// `None` when the metric has no present values
    pub statistics: Option<Statistics>,
    pub trend: YearlyTrend,
}

/// Everything the engine knows about a date at a place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateReport {
    pub target: Option<TargetDate>,
    pub reference_year: i32,
    pub record_count: usize,
    pub years: Vec<i32>,
    pub reliability: Reliability,
    pub hazards: Vec<HazardOdds>,
    pub metrics: Vec<MetricSummary>,
}

impl ClimateReport {
    #[must_use]
    pub fn hazard(&self, hazard: Hazard) -> Option<&HazardOdds> {
        self.hazards.iter().find(|odds| odds.hazard == hazard)
    }

    #[must_use]
    pub fn metric(&self, metric: Metric) -> Option<&MetricSummary> {
        self.metrics.iter().find(|summary| summary.metric == metric)
    }
}

/// Analyse an already windowed sample.
///
/// Invalid thresholds or policy are an `Err`; an empty or thin sample is
/// an `Ok` report flagged through [`Reliability`].
#[tracing::instrument(
    level = "debug",
    skip(sample, thresholds, policy),
    fields(records = sample.len())
)]
pub fn analyze(
    sample: &Sample,
    thresholds: &ThresholdSet,
    policy: &AnalysisPolicy,
    reference_year: i32,
) -> Result<ClimateReport> {
    thresholds.validate()?;
    policy.validate()?;

    let years: Vec<i32> = sample.distinct_years().into_iter().collect();
    let reliability = if sample.is_empty() {
        Reliability::NoData
    } else if years.len() < policy.min_sample_years {
        Reliability::Low
    } else {
        Reliability::Adequate
    };
    if reliability == Reliability::Low {
        warn!(
            years = years.len(),
            minimum = policy.min_sample_years,
            "Sample covers too few years for reliable odds"
        );
    }

    let hazards = Hazard::ALL
        .iter()
        .map(|&hazard| {
            let probability = hazard_probability(sample, hazard, thresholds);
            HazardOdds {
                hazard,
                threshold: thresholds.get(hazard),
                direction: hazard.direction(),
                probability,
                confidence: confidence_interval(probability.percentage, probability.total),
                climate_trend: hazard_climate_trend(
                    sample,
                    hazard,
                    thresholds,
                    reference_year,
                    policy.decade_years,
                ),
            }
        })
        .collect();

    let metrics = Metric::ALL
        .iter()
        .map(|&metric| MetricSummary {
            metric,
            statistics: summarize_metric(sample, metric),
            trend: yearly_trend(
                sample,
                metric,
                policy.significance_slope,
                reference_year,
                policy.decade_years,
            ),
        })
        .collect();

    info!(
        records = sample.len(),
        years = years.len(),
        ?reliability,
        "Climate analysis complete"
    );

    Ok(ClimateReport {
        target: None,
        reference_year,
        record_count: sample.len(),
        years,
        reliability,
        hazards,
        metrics,
    })
}

/// Window `sample` around `target` using the policy, then analyse it
pub fn analyze_for_date(
    sample: &Sample,
    target: TargetDate,
    thresholds: &ThresholdSet,
    policy: &AnalysisPolicy,
    reference_year: i32,
) -> Result<ClimateReport> {
    policy.validate()?;
    let windowed = sample.windowed(target, policy.window_days, policy.years_back, reference_year);
    let mut report = analyze(&windowed, thresholds, policy, reference_year)?;
    report.target = Some(target);
    Ok(report)
}
