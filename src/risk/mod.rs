//! Event risk module
//!
//! Weighted multi-factor risk for outdoor events:
//! - Event profiles and the catalog they come from
//! - Scoring a single observation against a profile
//! - Scoring every day of a historical sample

pub mod profile;
pub mod scoring;

pub use profile::{EventCatalog, EventProfile, RangeFactor, RiskFactors, ThresholdFactor};
pub use scoring::{
    EventClimatology, FactorRisk, FactorStatus, Recommendation, RiskFactorKind, RiskResult,
    event_climatology, score_event, score_profile,
};
