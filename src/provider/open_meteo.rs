//! Open-Meteo historical archive responses
//!
//! Daily values come as parallel arrays indexed by `daily.time`. Any
//! element may be `null` and arrays may be shorter than `time`.

use serde::Deserialize;
use tracing::{debug, warn};

use super::{MS_TO_KMH, ProviderBatch};
use crate::error::{Result, WeatherOddsError};
use crate::normalize::RawDailyEntry;

type Column = Option<Vec<Option<f64>>>;

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<DailyData>,
    #[serde(default)]
    daily_units: DailyUnits,
}

#[derive(Debug, Deserialize)]
struct DailyData {
    time: Vec<String>,
    #[serde(default, rename = "temperature_2m_max")]
    temperature_max: Column,
    #[serde(default, rename = "temperature_2m_min")]
    temperature_min: Column,
    #[serde(default, rename = "temperature_2m_mean")]
    temperature_mean: Column,
    #[serde(default, rename = "precipitation_sum")]
    precipitation: Column,
    #[serde(default, rename = "wind_speed_10m_max", alias = "windspeed_10m_max")]
    wind_speed: Column,
    #[serde(default, rename = "relative_humidity_2m_mean")]
    humidity: Column,
}

#[derive(Debug, Default, Deserialize)]
struct DailyUnits {
    #[serde(rename = "wind_speed_10m_max", alias = "windspeed_10m_max")]
    wind_speed: Option<String>,
}

fn at(column: &Column, i: usize) -> Option<f64> {
    column.as_ref().and_then(|v| v.get(i)).copied().flatten()
}

/// Decode an archive response into raw entries, wind in km/h
pub fn parse_archive(json: &str) -> Result<ProviderBatch> {
    let response: ArchiveResponse = serde_json::from_str(json)?;
    let daily = response
        .daily
        .ok_or_else(|| WeatherOddsError::parse("Open-Meteo response has no daily block"))?;

    let wind_factor = match response.daily_units.wind_speed.as_deref() {
        Some("m/s") => MS_TO_KMH,
        Some("km/h") | None => 1.0,
        Some(other) => {
            warn!("Unexpected Open-Meteo wind unit '{}', using values as km/h", other);
            1.0
        }
    };

    let entries: Vec<RawDailyEntry> = daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| RawDailyEntry {
            date: Some(date.clone()),
            temperature_max: at(&daily.temperature_max, i),
            temperature_min: at(&daily.temperature_min, i),
            temperature_avg: at(&daily.temperature_mean, i),
            precipitation: at(&daily.precipitation, i),
            wind_speed: at(&daily.wind_speed, i).map(|v| v * wind_factor),
            humidity: at(&daily.humidity, i),
        })
        .collect();

    debug!("Decoded {} Open-Meteo days", entries.len());
    Ok(ProviderBatch {
        entries,
        sentinel: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_archive() {
        let json = r#"{
            "latitude": 40.71, "longitude": -74.01,
            "daily_units": {"time": "iso8601", "wind_speed_10m_max": "km/h"},
            "daily": {
                "time": ["2020-07-04", "2020-07-05", "2020-07-06"],
                "temperature_2m_max": [31.0, null, 29.5],
                "temperature_2m_min": [22.0, 21.0],
                "precipitation_sum": [0.0, 12.4, null],
                "wind_speed_10m_max": [14.0, 22.0, 9.0]
            }
        }"#;
        let batch = parse_archive(json).unwrap();
        assert_eq!(batch.entries.len(), 3);
        assert_eq!(batch.sentinel, None);

        assert_eq!(batch.entries[0].precipitation, Some(0.0));
        assert_eq!(batch.entries[1].temperature_max, None);
        assert_eq!(batch.entries[2].temperature_min, None);
        assert_eq!(batch.entries[2].wind_speed, Some(9.0));
        assert_eq!(batch.entries[0].humidity, None);
    }

    #[test]
    fn test_wind_converted_from_metres_per_second() {
        let json = r#"{
            "daily_units": {"windspeed_10m_max": "m/s"},
            "daily": {"time": ["2020-01-01"], "windspeed_10m_max": [10.0]}
        }"#;
        let batch = parse_archive(json).unwrap();
        assert_eq!(batch.entries[0].wind_speed, Some(36.0));
    }

    #[test]
    fn test_missing_daily_is_parse_error() {
        let err = parse_archive(r#"{"error": true, "reason": "bad range"}"#).unwrap_err();
        assert!(matches!(err, WeatherOddsError::Parse { .. }));
    }
}
