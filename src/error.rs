//! Error types and handling for the `WeatherOdds` engine

use thiserror::Error;

/// Main error type for the `WeatherOdds` engine
#[derive(Error, Debug)]
pub enum WeatherOddsError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid caller input (non-finite threshold, bad weight, unknown event)
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Provider payload or record that cannot be interpreted
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON decoding errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl WeatherOddsError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller rather than by the data
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Validation { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherOddsError::Config { .. } => {
                "Configuration error. Please check your config file and thresholds.".to_string()
            }
            WeatherOddsError::Validation { message } => format!("Invalid input: {message}"),
            WeatherOddsError::Parse { .. } | WeatherOddsError::Json { .. } => {
                "The weather data could not be read. The provider format may have changed."
                    .to_string()
            }
            WeatherOddsError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

/// Result alias used across the engine
pub type Result<T> = std::result::Result<T, WeatherOddsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = WeatherOddsError::config("window too wide");
        assert!(matches!(config_err, WeatherOddsError::Config { .. }));

        let validation_err = WeatherOddsError::validation("threshold is NaN");
        assert!(matches!(validation_err, WeatherOddsError::Validation { .. }));
        assert!(validation_err.is_caller_error());

        let parse_err = WeatherOddsError::parse("missing daily block");
        assert!(!parse_err.is_caller_error());
    }

    #[test]
    fn test_user_messages() {
        let config_err = WeatherOddsError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = WeatherOddsError::validation("very_hot is not finite");
        assert!(validation_err.user_message().contains("very_hot is not finite"));

        let parse_err = WeatherOddsError::parse("bad");
        assert!(parse_err.user_message().contains("could not be read"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WeatherOddsError = io_err.into();
        assert!(matches!(err, WeatherOddsError::Io { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: WeatherOddsError = json_err.into();
        assert!(matches!(err, WeatherOddsError::Json { .. }));
    }
}
