//! Data models for the WeatherOdds engine
//!
//! This module contains the core domain models organized by concern:
//! - Record: daily observations, metrics, target dates and the analysed sample
//! - Thresholds: hazard thresholds and comparison directions
//! - Observation: a single-point reading used for event risk scoring
//! - Location: geographic coordinates and metadata

pub mod location;
pub mod observation;
pub mod record;
pub mod thresholds;

// Re-export all public types for convenient access
pub use location::Location;
pub use observation::Observation;
pub use record::{DailyRecord, Metric, Sample, TargetDate};
pub use thresholds::{Direction, Hazard, ThresholdSet};
