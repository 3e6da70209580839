//! Analysis module
//!
//! Pure, stateless statistics over a normalised [`crate::models::Sample`]:
//! - Distributional statistics (mean, median, spread, percentiles, outliers)
//! - Threshold-crossing probabilities and their confidence intervals
//! - Heat index and discomfort probability
//! - Yearly regression and decade-over-decade climate trends
//! - Aggregated reports, singly or in parallel batches

pub mod batch;
pub mod confidence;
pub mod heat_index;
pub mod probability;
pub mod report;
pub mod stats;
pub mod trend;

// Re-export commonly used types from submodules
pub use batch::{AnalysisRequest, LocationReport, analyze_batch};
pub use confidence::{ConfidenceInterval, confidence_interval};
pub use heat_index::{discomfort_probability, heat_index};
pub use probability::{ProbabilityResult, hazard_probability, probability_of};
pub use report::{
    AnalysisPolicy, ClimateReport, HazardOdds, MetricSummary, Reliability, analyze,
    analyze_for_date,
};
pub use stats::{Percentiles, Statistics, mean, percentile, summarize, summarize_metric};
pub use trend::{
    ClimateTrend, ClimateTrendClass, Regression, TrendDirection, TrendMagnitude, YearlyTrend,
    climate_trend, hazard_climate_trend, linear_regression, yearly_trend,
};
