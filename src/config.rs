//! Configuration management for the `WeatherOdds` engine
//!
//! Handles loading configuration from files and environment variables,
//! and validates thresholds, analysis policy and logging settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::AnalysisPolicy;
use crate::error::WeatherOddsError;
use crate::logging::{LOG_LEVELS, LoggingConfig, default_log_level};
use crate::models::ThresholdSet;
use crate::risk::EventCatalog;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hazard thresholds used when the caller supplies none
    pub thresholds: ThresholdSet,
    /// Windowing, reliability and trend settings
    pub analysis: AnalysisPolicy,
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
}

/// Where event profiles come from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON file replacing the built-in catalog
    pub path: Option<String>,
}

impl EngineConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            debug!("Reading configuration from {}", config_file.display());
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHER_ODDS_THRESHOLDS__VERY_HOT=35 and friends
        builder = builder.add_source(
            Environment::with_prefix("WEATHER_ODDS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: EngineConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-odds").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.analysis.decade_years == 0 {
            self.analysis.decade_years = AnalysisPolicy::default().decade_years;
        }
        if self.analysis.years_back == 0 {
            self.analysis.years_back = AnalysisPolicy::default().years_back;
        }
        if self.catalog.path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.catalog.path = None;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.thresholds
            .validate()
            .map_err(|e| WeatherOddsError::config(e.to_string()))?;
        self.analysis
            .validate()
            .map_err(|e| WeatherOddsError::config(e.to_string()))?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(WeatherOddsError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ))
            .into());
        }
        Ok(())
    }

    /// The configured event catalog, or the built-in one
    pub fn event_catalog(&self) -> Result<EventCatalog> {
        match &self.catalog.path {
            Some(path) => EventCatalog::load(Path::new(path))
                .with_context(|| format!("Failed to load event catalog from {path}")),
            None => Ok(EventCatalog::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("weather-odds-{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.thresholds.very_hot, 32.0);
        assert_eq!(config.analysis.window_days, 7);
        assert_eq!(config.analysis.years_back, 20);
        assert_eq!(config.logging.level, "info");
        assert!(config.catalog.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = EngineConfig::default();
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_non_finite_threshold() {
        let mut config = EngineConfig::default();
        config.thresholds.very_windy = f64::INFINITY;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_apply_defaults() {
        let mut config = EngineConfig::default();
        config.logging.level = String::new();
        config.analysis.decade_years = 0;
        config.catalog.path = Some("  ".to_string());
        config.apply_defaults();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.analysis.decade_years, 10);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = temp_file(
            "config.toml",
            r#"
[thresholds]
very_hot = 35.0

[analysis]
window_days = 3

[logging]
level = "debug"
format = "json"
"#,
        );
        let config = EngineConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(config.thresholds.very_hot, 35.0);
        assert_eq!(config.thresholds.very_cold, 0.0);
        assert_eq!(config.analysis.window_days, 3);
        assert_eq!(config.analysis.years_back, 20);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_event_catalog_defaults_to_builtin() {
        let catalog = EngineConfig::default().event_catalog().unwrap();
        assert!(catalog.get("wedding").is_some());
    }

    #[test]
    fn test_event_catalog_missing_file() {
        let mut config = EngineConfig::default();
        config.catalog.path = Some("/nonexistent/events.json".to_string());
        assert!(config.event_catalog().is_err());
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = EngineConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weather-odds"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
