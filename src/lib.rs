//! `WeatherOdds` - Historical weather odds for a calendar date
//!
//! Given years of daily observations around a target day, this library
//! estimates how likely very hot, cold, windy, wet or uncomfortable
//! conditions are, how that likelihood is shifting, and how risky the day
//! is for a given outdoor event. Every operation is a pure function over
//! caller-supplied data.

pub mod analysis;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod provider;
pub mod risk;

// Re-export core types for public API
pub use analysis::{AnalysisPolicy, ClimateReport, analyze, analyze_for_date};
pub use config::EngineConfig;
pub use error::{Result, WeatherOddsError};
pub use models::{DailyRecord, Hazard, Location, Observation, Sample, TargetDate, ThresholdSet};
pub use normalize::{Normalized, RawDailyEntry, normalize};
pub use provider::{HistoricalSource, JsonFileSource, ProviderBatch, ProviderFormat};
pub use risk::{EventCatalog, RiskResult, score_event};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
