//! Event profiles and the catalog they are looked up in

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, WeatherOddsError};

/// Factor triggered when a value passes a single threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdFactor {
    /// Relative importance, 0-1
    pub weight: f64,
    pub threshold: f64,
}

/// Factor triggered when a value leaves a comfortable range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeFactor {
    /// Relative importance, 0-1
    pub weight: f64,
    pub min: f64,
    pub max: f64,
}

/// Weather factors an event cares about.
///
/// Weights are used as given; they are not normalised to sum to 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskFactors {
    /// Precipitation in mm
    pub rain: Option<ThresholdFactor>,
    /// Wind speed in km/h
    pub wind: Option<ThresholdFactor>,
    /// Temperature range in Celsius
    pub temperature: Option<RangeFactor>,
    /// Minimum visibility in km
    pub visibility: Option<ThresholdFactor>,
    /// Thunderstorm probability in percent
    pub storm: Option<ThresholdFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventProfile {
    pub name: String,
    pub icon: String,
    pub factors: RiskFactors,
}

impl EventProfile {
    /// Weights must lie in 0..=1, thresholds must be positive and finite,
    /// and a temperature range must not be inverted.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("rain", self.factors.rain),
            ("wind", self.factors.wind),
            ("visibility", self.factors.visibility),
            ("storm", self.factors.storm),
        ];
        for (factor, value) in thresholds {
            if let Some(f) = value {
                check_weight(&self.name, factor, f.weight)?;
                if !f.threshold.is_finite() || f.threshold <= 0.0 {
                    return Err(WeatherOddsError::validation(format!(
                        "{}: {factor} threshold must be a positive number",
                        self.name
                    )));
                }
            }
        }
        if let Some(range) = self.factors.temperature {
            check_weight(&self.name, "temperature", range.weight)?;
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return Err(WeatherOddsError::validation(format!(
                    "{}: temperature range {}..{} is invalid",
                    self.name, range.min, range.max
                )));
            }
        }
        Ok(())
    }
}

fn check_weight(event: &str, factor: &str, weight: f64) -> Result<()> {
    if (0.0..=1.0).contains(&weight) {
        Ok(())
    } else {
        Err(WeatherOddsError::validation(format!(
            "{event}: {factor} weight {weight} must be between 0 and 1"
        )))
    }
}

/// Event profiles by key (`wedding`, `hiking`, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCatalog {
    profiles: BTreeMap<String, EventProfile>,
}

impl EventCatalog {
    /// Catalog with no profiles
    #[must_use]
    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EventProfile> {
        self.profiles.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Add or replace a profile after validating it
    pub fn insert(&mut self, key: impl Into<String>, profile: EventProfile) -> Result<()> {
        profile.validate()?;
        self.profiles.insert(key.into(), profile);
        Ok(())
    }

    /// Parse and validate a JSON object of `key -> profile`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: EventCatalog = serde_json::from_str(json)?;
        for profile in catalog.profiles.values() {
            profile.validate()?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        info!("Loaded {} event profiles from {}", catalog.len(), path.display());
        Ok(catalog)
    }
}

fn threshold(weight: f64, threshold: f64) -> Option<ThresholdFactor> {
    Some(ThresholdFactor { weight, threshold })
}

fn range(weight: f64, min: f64, max: f64) -> Option<RangeFactor> {
    Some(RangeFactor { weight, min, max })
}

fn profile(name: &str, icon: &str, factors: RiskFactors) -> EventProfile {
    EventProfile {
        name: name.to_string(),
        icon: icon.to_string(),
        factors,
    }
}

impl Default for EventCatalog {
    /// Reference catalog of common outdoor events
    fn default() -> Self {
        let entries = [
            (
                "wedding",
                profile(
                    "Wedding",
                    "💒",
                    RiskFactors {
                        rain: threshold(0.4, 1.0),
                        wind: threshold(0.3, 30.0),
                        temperature: range(0.3, 18.0, 30.0),
                        ..RiskFactors::default()
                    },
                ),
            ),
            (
                "outdoor_concert",
                profile(
                    "Outdoor Concert",
                    "🎵",
                    RiskFactors {
                        rain: threshold(0.4, 2.0),
                        wind: threshold(0.3, 40.0),
                        temperature: range(0.2, 15.0, 32.0),
                        storm: threshold(0.1, 30.0),
                        ..RiskFactors::default()
                    },
                ),
            ),
            (
                "sports",
                profile(
                    "Sports Event",
                    "⚽",
                    RiskFactors {
                        rain: threshold(0.3, 5.0),
                        wind: threshold(0.3, 35.0),
                        temperature: range(0.4, 10.0, 30.0),
                        ..RiskFactors::default()
                    },
                ),
            ),
            (
                "hiking",
                profile(
                    "Hiking",
                    "🥾",
                    RiskFactors {
                        rain: threshold(0.35, 5.0),
                        wind: threshold(0.25, 40.0),
                        temperature: range(0.3, 5.0, 28.0),
                        visibility: threshold(0.1, 5.0),
                        ..RiskFactors::default()
                    },
                ),
            ),
            (
                "picnic",
                profile(
                    "Picnic",
                    "🧺",
                    RiskFactors {
                        rain: threshold(0.5, 0.5),
                        wind: threshold(0.2, 25.0),
                        temperature: range(0.3, 18.0, 28.0),
                        ..RiskFactors::default()
                    },
                ),
            ),
            (
                "beach",
                profile(
                    "Beach Day",
                    "🏖️",
                    RiskFactors {
                        rain: threshold(0.3, 1.0),
                        wind: threshold(0.3, 30.0),
                        temperature: range(0.4, 24.0, 35.0),
                        ..RiskFactors::default()
                    },
                ),
            ),
            (
                "camping",
                profile(
                    "Camping",
                    "⛺",
                    RiskFactors {
                        rain: threshold(0.35, 3.0),
                        wind: threshold(0.3, 35.0),
                        temperature: range(0.25, 8.0, 30.0),
                        storm: threshold(0.1, 20.0),
                        ..RiskFactors::default()
                    },
                ),
            ),
        ];

        Self {
            profiles: entries
                .into_iter()
                .map(|(key, profile)| (key.to_string(), profile))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_catalog_is_valid() {
        let catalog = EventCatalog::default();
        assert_eq!(catalog.len(), 7);
        for key in catalog.keys() {
            assert!(catalog.get(key).unwrap().validate().is_ok(), "{key}");
        }
    }

    #[test]
    fn test_wedding_profile() {
        let catalog = EventCatalog::default();
        let wedding = catalog.get("wedding").unwrap();
        assert_eq!(
            wedding.factors.rain,
            Some(ThresholdFactor {
                weight: 0.4,
                threshold: 1.0
            })
        );
        assert_eq!(wedding.factors.visibility, None);
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "market": {
                "name": "Farmers Market",
                "icon": "🥕",
                "factors": {
                    "rain": {"weight": 0.6, "threshold": 2.0},
                    "temperature": {"weight": 0.4, "min": 5.0, "max": 30.0}
                }
            }
        }"#;
        let catalog = EventCatalog::from_json_str(json).unwrap();
        let market = catalog.get("market").unwrap();
        assert_eq!(market.name, "Farmers Market");
        assert!(market.factors.wind.is_none());
    }

    #[test]
    fn test_catalog_rejects_bad_weight() {
        let json = r#"{
            "gala": {"name": "Gala", "icon": "🎉",
                     "factors": {"rain": {"weight": 1.5, "threshold": 1.0}}}
        }"#;
        let err = EventCatalog::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("weight"));
    }

    #[test]
    fn test_insert_rejects_inverted_range() {
        let mut catalog = EventCatalog::empty();
        let bad = profile(
            "Odd",
            "?",
            RiskFactors {
                temperature: range(0.5, 30.0, 10.0),
                ..RiskFactors::default()
            },
        );
        assert!(catalog.insert("odd", bad).is_err());
        assert!(catalog.is_empty());
    }
}
