//! Hazard thresholds and comparison directions

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::Metric;
use crate::error::{Result, WeatherOddsError};

/// Which side of a threshold counts as a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Above,
    Below,
}

impl Direction {
    /// Strict comparison: a value equal to the threshold never counts
    #[must_use]
    pub fn exceeds(self, value: f64, threshold: f64) -> bool {
        match self {
            Direction::Above => value > threshold,
            Direction::Below => value < threshold,
        }
    }
}

/// The hazards a [`ThresholdSet`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hazard {
    VeryHot,
    VeryCold,
    VeryWindy,
    VeryWet,
    VeryUncomfortable,
}

impl Hazard {
    pub const ALL: [Hazard; 5] = [
        Hazard::VeryHot,
        Hazard::VeryCold,
        Hazard::VeryWindy,
        Hazard::VeryWet,
        Hazard::VeryUncomfortable,
    ];

    #[must_use]
    pub fn direction(self) -> Direction {
        match self {
            Hazard::VeryCold => Direction::Below,
            _ => Direction::Above,
        }
    }

    /// Metric compared against the threshold.
    ///
    /// `VeryUncomfortable` is evaluated on a heat index derived from the
    /// average temperature and humidity, not on a stored metric.
    #[must_use]
    pub fn metric(self) -> Option<Metric> {
        match self {
            Hazard::VeryHot => Some(Metric::TemperatureMax),
            Hazard::VeryCold => Some(Metric::TemperatureMin),
            Hazard::VeryWindy => Some(Metric::WindSpeed),
            Hazard::VeryWet => Some(Metric::Precipitation),
            Hazard::VeryUncomfortable => None,
        }
    }
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hazard::VeryHot => write!(f, "Very hot"),
            Hazard::VeryCold => write!(f, "Very cold"),
            Hazard::VeryWindy => write!(f, "Very windy"),
            Hazard::VeryWet => write!(f, "Very wet"),
            Hazard::VeryUncomfortable => write!(f, "Very uncomfortable"),
        }
    }
}

/// Caller-supplied hazard thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSet {
    /// Maximum temperature in Celsius, hit when above
    pub very_hot: f64,
    /// Minimum temperature in Celsius, hit when below
    pub very_cold: f64,
    /// Wind speed in km/h, hit when above
    pub very_windy: f64,
    /// Precipitation in mm/day, hit when above
    pub very_wet: f64,
    /// Heat index in Celsius, hit when above
    pub very_uncomfortable: f64,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            very_hot: 32.0,
            very_cold: 0.0,
            very_windy: 40.0,
            very_wet: 10.0,
            very_uncomfortable: 32.0,
        }
    }
}

impl ThresholdSet {
    #[must_use]
    pub fn get(&self, hazard: Hazard) -> f64 {
        match hazard {
            Hazard::VeryHot => self.very_hot,
            Hazard::VeryCold => self.very_cold,
            Hazard::VeryWindy => self.very_windy,
            Hazard::VeryWet => self.very_wet,
            Hazard::VeryUncomfortable => self.very_uncomfortable,
        }
    }

    /// Every threshold must be finite; no ordering between hot and cold is enforced
    pub fn validate(&self) -> Result<()> {
        for hazard in Hazard::ALL {
            let value = self.get(hazard);
            if !value.is_finite() {
                return Err(WeatherOddsError::validation(format!(
                    "threshold for {hazard} must be a finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
