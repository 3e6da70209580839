//! NASA POWER daily point responses
//!
//! Parameters arrive as separate `YYYYMMDD -> value` maps under
//! `properties.parameter`; missing days carry `header.fill_value`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use tracing::debug;

use super::{MS_TO_KMH, ProviderBatch};
use crate::error::{Result, WeatherOddsError};
use crate::normalize::RawDailyEntry;

/// Fill value POWER documents when the header omits it
pub const DEFAULT_FILL_VALUE: f64 = -999.0;

type Series = BTreeMap<String, Option<f64>>;

#[derive(Debug, Deserialize)]
struct PowerResponse {
    #[serde(default)]
    header: PowerHeader,
    properties: Option<PowerProperties>,
}

#[derive(Debug, Default, Deserialize)]
struct PowerHeader {
    fill_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: PowerParameters,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PowerParameters {
    #[serde(rename = "T2M_MAX")]
    t2m_max: Series,
    #[serde(rename = "T2M_MIN")]
    t2m_min: Series,
    #[serde(rename = "T2M")]
    t2m: Series,
    #[serde(rename = "PRECTOTCORR")]
    prectotcorr: Series,
    #[serde(rename = "PRECTOT")]
    prectot: Series,
    /// m/s at 2 m
    #[serde(rename = "WS2M")]
    ws2m: Series,
    #[serde(rename = "RH2M")]
    rh2m: Series,
}

impl PowerParameters {
    fn dates(&self) -> BTreeSet<&String> {
        [
            &self.t2m_max,
            &self.t2m_min,
            &self.t2m,
            &self.prectotcorr,
            &self.prectot,
            &self.ws2m,
            &self.rh2m,
        ]
        .into_iter()
        .flat_map(BTreeMap::keys)
        .collect()
    }
}

fn lookup(series: &Series, date: &str) -> Option<f64> {
    series.get(date).copied().flatten()
}

/// Decode a POWER daily response into raw entries.
///
/// Wind is converted to km/h; the fill value is left untouched so the
/// normaliser can recognise it.
pub fn parse_daily(json: &str) -> Result<ProviderBatch> {
    let response: PowerResponse = serde_json::from_str(json)?;
    let properties = response
        .properties
        .ok_or_else(|| WeatherOddsError::parse("POWER response has no properties block"))?;
    let params = properties.parameter;
    let fill = response.header.fill_value.unwrap_or(DEFAULT_FILL_VALUE);

    // PRECTOTCORR supersedes the older PRECTOT
    let precipitation = if params.prectotcorr.is_empty() {
        &params.prectot
    } else {
        &params.prectotcorr
    };

    let entries: Vec<RawDailyEntry> = params
        .dates()
        .into_iter()
        .map(|date| RawDailyEntry {
            date: Some(date.clone()),
            temperature_max: lookup(&params.t2m_max, date),
            temperature_min: lookup(&params.t2m_min, date),
            temperature_avg: lookup(&params.t2m, date),
            precipitation: lookup(precipitation, date),
            wind_speed: lookup(&params.ws2m, date)
                .map(|v| if v == fill { v } else { v * MS_TO_KMH }),
            humidity: lookup(&params.rh2m, date),
        })
        .collect();

    debug!("Decoded {} POWER days", entries.len());
    Ok(ProviderBatch {
        entries,
        sentinel: Some(fill),
    })
}
