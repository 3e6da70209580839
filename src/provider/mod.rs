//! Provider boundary
//!
//! Each adapter maps one provider's actual daily schema onto
//! [`RawDailyEntry`] values. Fetching, retrying and caching belong to the
//! caller; the adapters only read payloads that are already in memory.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::WeatherOddsError;
use crate::normalize::{Normalized, RawDailyEntry, normalize};

pub mod nasa_power;
pub mod open_meteo;

/// Conversion factor from m/s to km/h
pub(crate) const MS_TO_KMH: f64 = 3.6;

/// Raw entries and the missing-value sentinel they use
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderBatch {
    pub entries: Vec<RawDailyEntry>,
    pub sentinel: Option<f64>,
}

impl ProviderBatch {
    /// Normalise the batch into a sample
    #[must_use]
    pub fn normalize(&self) -> Normalized {
        normalize(&self.entries, self.sentinel)
    }
}

/// Payload layouts the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderFormat {
    /// NASA POWER daily point API
    NasaPower,
    /// Open-Meteo historical archive API
    OpenMeteo,
    /// A JSON array of [`RawDailyEntry`]
    Raw,
}

impl ProviderFormat {
    /// Decode `json` laid out in this format
    pub fn parse(self, json: &str) -> crate::error::Result<ProviderBatch> {
        match self {
            ProviderFormat::NasaPower => nasa_power::parse_daily(json),
            ProviderFormat::OpenMeteo => open_meteo::parse_archive(json),
            ProviderFormat::Raw => Ok(ProviderBatch {
                entries: serde_json::from_str(json)?,
                sentinel: None,
            }),
        }
    }
}

impl FromStr for ProviderFormat {
    type Err = WeatherOddsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "nasa-power" | "nasa_power" | "power" => Ok(Self::NasaPower),
            "open-meteo" | "open_meteo" | "openmeteo" => Ok(Self::OpenMeteo),
            "raw" => Ok(Self::Raw),
            other => Err(WeatherOddsError::validation(format!(
                "unknown provider format '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ProviderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderFormat::NasaPower => write!(f, "nasa-power"),
            ProviderFormat::OpenMeteo => write!(f, "open-meteo"),
            ProviderFormat::Raw => write!(f, "raw"),
        }
    }
}

/// Anything that can hand over a batch of historical daily entries
pub trait HistoricalSource {
    fn load(&self) -> Result<ProviderBatch>;
}

/// A provider response saved to disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    pub path: PathBuf,
    pub format: ProviderFormat,
}

impl HistoricalSource for JsonFileSource {
    fn load(&self) -> Result<ProviderBatch> {
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        self.format
            .parse(&json)
            .with_context(|| format!("Failed to decode {} as {}", self.path.display(), self.format))
    }
}
