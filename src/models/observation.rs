//! Single-point weather reading used for event risk scoring

use serde::{Deserialize, Serialize};

use super::record::{DailyRecord, Metric, Sample};
use crate::analysis::stats::mean;

/// A weather reading for one place and time.
///
/// `visibility` and `storm_probability` are rarely supplied by historical
/// providers; factors that depend on them are skipped when they are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Observation {
    /// Air temperature in Celsius
    pub temperature: Option<f64>,
    /// Precipitation in mm
    pub precipitation: Option<f64>,
    /// Wind speed in km/h
    pub wind_speed: Option<f64>,
    /// Visibility in km
    pub visibility: Option<f64>,
    /// Thunderstorm probability in percent
    pub storm_probability: Option<f64>,
}

impl Observation {
    #[must_use]
    pub fn new(temperature: f64, precipitation: f64, wind_speed: f64) -> Self {
        Self {
            temperature: Some(temperature),
            precipitation: Some(precipitation),
            wind_speed: Some(wind_speed),
            ..Self::default()
        }
    }

    /// Reading for one historical day; average temperature is used
    #[must_use]
    pub fn from_record(record: &DailyRecord) -> Self {
        Self {
            temperature: record.temperature_avg.or(record.temperature_max),
            precipitation: record.precipitation,
            wind_speed: record.wind_speed,
            ..Self::default()
        }
    }

    /// Typical reading for a sample: the mean of the present values per field
    #[must_use]
    pub fn from_sample(sample: &Sample) -> Self {
        Self {
            temperature: mean(&sample.present_values(Metric::TemperatureAvg)),
            precipitation: mean(&sample.present_values(Metric::Precipitation)),
            wind_speed: mean(&sample.present_values(Metric::WindSpeed)),
            ..Self::default()
        }
    }

    /// True when no field carries a value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.precipitation.is_none()
            && self.wind_speed.is_none()
            && self.visibility.is_none()
            && self.storm_probability.is_none()
    }
}
