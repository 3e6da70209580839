//! Record normalisation
//!
//! Turns loosely-typed provider entries into a date-ordered [`Sample`].
//! Missing values (provider sentinels, `null`, `NaN`, out-of-range
//! readings) become `None`; they are never replaced by zero, since zero is
//! a legitimate precipitation or wind reading.

use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{DailyRecord, Sample};

/// Sentinel tolerance; providers emit the fill value verbatim
const SENTINEL_EPSILON: f64 = 1e-6;

const PRECIPITATION_RANGE: RangeInclusive<f64> = 0.0..=f64::MAX;
const WIND_RANGE: RangeInclusive<f64> = 0.0..=f64::MAX;
const HUMIDITY_RANGE: RangeInclusive<f64> = 0.0..=100.0;
const TEMPERATURE_RANGE: RangeInclusive<f64> = -100.0..=70.0;

/// A daily entry as handed over by a provider adapter.
///
/// Numeric fields accept numbers, numeric strings and `null`; anything else
/// deserialises as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDailyEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(alias = "temperatureMax", deserialize_with = "lenient_number")]
    pub temperature_max: Option<f64>,
    #[serde(alias = "temperatureMin", deserialize_with = "lenient_number")]
    pub temperature_min: Option<f64>,
    #[serde(alias = "temperatureAvg", deserialize_with = "lenient_number")]
    pub temperature_avg: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub precipitation: Option<f64>,
    #[serde(alias = "windSpeed", deserialize_with = "lenient_number")]
    pub wind_speed: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub humidity: Option<f64>,
}

/// Why an entry did not make it into the sample
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum DropReason {
    MissingDate,
    UnparseableDate(String),
    NoValues,
}

/// An entry rejected during normalisation, by position in the input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedEntry {
    pub index: usize,
    pub reason: DropReason,
}

/// Output of [`normalize`]
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub sample: Sample,
    pub dropped: Vec<DroppedEntry>,
}

/// Clean `entries` into a sample.
///
/// `sentinel` is the provider's missing-value marker (for example `-999`).
/// A failing entry is dropped on its own; the rest of the batch survives.
#[tracing::instrument(level = "debug", skip(entries), fields(entries = entries.len()))]
pub fn normalize(entries: &[RawDailyEntry], sentinel: Option<f64>) -> Normalized {
    let mut records = Vec::with_capacity(entries.len());
    let mut dropped = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match normalize_entry(entry, sentinel) {
            Ok(record) => records.push(record),
            Err(reason) => {
                debug!(index, ?reason, "Dropping raw entry");
                dropped.push(DroppedEntry { index, reason });
            }
        }
    }

    let undatable = dropped
        .iter()
        .filter(|d| !matches!(d.reason, DropReason::NoValues))
        .count();
    if undatable > 0 {
        warn!("{} of {} entries had no usable date", undatable, entries.len());
    }

    Normalized {
        sample: Sample::new(records),
        dropped,
    }
}

/// Clean a single entry
pub fn normalize_entry(
    entry: &RawDailyEntry,
    sentinel: Option<f64>,
) -> std::result::Result<DailyRecord, DropReason> {
    let raw_date = entry.date.as_deref().ok_or(DropReason::MissingDate)?;
    let date = parse_date(raw_date)
        .ok_or_else(|| DropReason::UnparseableDate(raw_date.to_string()))?;

    let clean = |value: Option<f64>, range: RangeInclusive<f64>, field: &str| {
        clean_value(value, sentinel, &range).or_else(|| {
            if let Some(v) = value {
                if !is_missing(v, sentinel) {
                    debug!(%date, field, value = v, "Discarding out-of-range value");
                }
            }
            None
        })
    };

    let temperature_max = clean(entry.temperature_max, TEMPERATURE_RANGE, "temperature_max");
    let temperature_min = clean(entry.temperature_min, TEMPERATURE_RANGE, "temperature_min");
    let temperature_avg = clean(entry.temperature_avg, TEMPERATURE_RANGE, "temperature_avg")
        .or_else(|| match (temperature_max, temperature_min) {
            (Some(max), Some(min)) => Some((max + min) / 2.0),
            _ => None,
        });

    let record = DailyRecord {
        date,
        temperature_max,
        temperature_min,
        temperature_avg,
        precipitation: clean(entry.precipitation, PRECIPITATION_RANGE, "precipitation"),
        wind_speed: clean(entry.wind_speed, WIND_RANGE, "wind_speed"),
        humidity: clean(entry.humidity, HUMIDITY_RANGE, "humidity"),
    };

    if record.has_any_value() {
        Ok(record)
    } else {
        Err(DropReason::NoValues)
    }
}

/// Accepts `YYYY-MM-DD`, `YYYYMMDD`, RFC 3339 and `YYYY-MM-DDTHH:MM[:SS]`
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
                .ok()
                .map(|dt| dt.date())
        })
}

fn is_missing(value: f64, sentinel: Option<f64>) -> bool {
    !value.is_finite() || sentinel.is_some_and(|s| (value - s).abs() < SENTINEL_EPSILON)
}

fn clean_value(
    value: Option<f64>,
    sentinel: Option<f64>,
    range: &RangeInclusive<f64>,
) -> Option<f64> {
    value.filter(|v| !is_missing(*v, sentinel) && range.contains(v))
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
