//! Daily observation records and the sample an analysis runs over

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WeatherOddsError};

/// One cleaned observation for one historical date.
///
/// Every measurement is optional: `None` means the provider had no usable
/// value, which is different from a measured zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Daily maximum temperature in Celsius
    pub temperature_max: Option<f64>,
    /// Daily minimum temperature in Celsius
    pub temperature_min: Option<f64>,
    /// Daily mean temperature in Celsius
    pub temperature_avg: Option<f64>,
    /// Precipitation in mm/day
    pub precipitation: Option<f64>,
    /// Wind speed in km/h
    pub wind_speed: Option<f64>,
    /// Relative humidity in percent (0-100)
    pub humidity: Option<f64>,
}

impl DailyRecord {
    /// Record for `date` with every measurement absent
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            temperature_max: None,
            temperature_min: None,
            temperature_avg: None,
            precipitation: None,
            wind_speed: None,
            humidity: None,
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// True when at least one measurement is present
    #[must_use]
    pub fn has_any_value(&self) -> bool {
        Metric::ALL.iter().any(|metric| self.value(*metric).is_some())
    }

    /// Value of `metric`, if present
    #[must_use]
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::TemperatureMax => self.temperature_max,
            Metric::TemperatureMin => self.temperature_min,
            Metric::TemperatureAvg => self.temperature_avg,
            Metric::Precipitation => self.precipitation,
            Metric::WindSpeed => self.wind_speed,
            Metric::Humidity => self.humidity,
        }
    }
}

/// Measurements carried by a [`DailyRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TemperatureMax,
    TemperatureMin,
    TemperatureAvg,
    Precipitation,
    WindSpeed,
    Humidity,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::TemperatureMax,
        Metric::TemperatureMin,
        Metric::TemperatureAvg,
        Metric::Precipitation,
        Metric::WindSpeed,
        Metric::Humidity,
    ];

    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Metric::TemperatureMax | Metric::TemperatureMin | Metric::TemperatureAvg => "°C",
            Metric::Precipitation => "mm/day",
            Metric::WindSpeed => "km/h",
            Metric::Humidity => "%",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::TemperatureMax => write!(f, "Maximum temperature"),
            Metric::TemperatureMin => write!(f, "Minimum temperature"),
            Metric::TemperatureAvg => write!(f, "Average temperature"),
            Metric::Precipitation => write!(f, "Precipitation"),
            Metric::WindSpeed => write!(f, "Wind speed"),
            Metric::Humidity => write!(f, "Humidity"),
        }
    }
}

/// A calendar day (month and day) that recurs every year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetDate {
    month: u32,
    day: u32,
}

impl TargetDate {
    /// Create a target date; February 29 is accepted
    pub fn new(month: u32, day: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(WeatherOddsError::validation(format!(
                "{month:02}-{day:02} is not a calendar date"
            )));
        }
        Ok(Self { month, day })
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.day
    }

    /// The target in `year`. February 29 falls back to February 28 outside leap years.
    #[must_use]
    pub fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .or_else(|| NaiveDate::from_ymd_opt(year, self.month, self.day.saturating_sub(1)))
    }

    /// Closest occurrence of the target to `date` and its distance in days.
    ///
    /// Neighbouring years are considered so that a window around early
    /// January reaches back into late December.
    #[must_use]
    pub fn nearest_occurrence(self, date: NaiveDate) -> Option<(NaiveDate, i64)> {
        (date.year() - 1..=date.year() + 1)
            .filter_map(|year| self.in_year(year))
            .map(|anchor| (anchor, (date - anchor).num_days().abs()))
            .min_by_key(|&(_, distance)| distance)
    }

    /// True when `date` lies within ± `window_days` of the target
    #[must_use]
    pub fn within_window(self, date: NaiveDate, window_days: u32) -> bool {
        self.nearest_occurrence(date)
            .is_some_and(|(_, distance)| distance <= i64::from(window_days))
    }
}

impl fmt::Display for TargetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Date-ordered, immutable set of records for one analysis request.
///
/// A sample cut by [`Sample::windowed`] remembers its target, so records
/// are grouped by season (the year of the target occurrence they were
/// picked for) rather than by calendar year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    records: Vec<DailyRecord>,
    season_target: Option<TargetDate>,
}

impl Sample {
    /// Build a sample; records are ordered by date
    #[must_use]
    pub fn new(mut records: Vec<DailyRecord>) -> Self {
        records.sort_by_key(|record| record.date);
        Self {
            records,
            season_target: None,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of `metric` in date order, absent ones included as `None`
    pub fn values(&self, metric: Metric) -> impl Iterator<Item = Option<f64>> + '_ {
        self.records.iter().map(move |record| record.value(metric))
    }

    /// Present values of `metric` in date order
    #[must_use]
    pub fn present_values(&self, metric: Metric) -> Vec<f64> {
        self.values(metric).flatten().collect()
    }

    /// Season a record belongs to: the year of the nearest target
    /// occurrence for a windowed sample, the calendar year otherwise.
    #[must_use]
    pub fn season_of(&self, record: &DailyRecord) -> i32 {
        self.season_target
            .and_then(|target| target.nearest_occurrence(record.date))
            .map_or_else(|| record.year(), |(anchor, _)| anchor.year())
    }

    /// Distinct seasons covered by the sample
    #[must_use]
    pub fn distinct_years(&self) -> BTreeSet<i32> {
        self.records
            .iter()
            .map(|record| self.season_of(record))
            .collect()
    }

    /// Sub-sample of the records whose season satisfies `keep`
    #[must_use]
    pub fn filter_years(&self, mut keep: impl FnMut(i32) -> bool) -> Sample {
        Sample {
            records: self
                .records
                .iter()
                .filter(|record| keep(self.season_of(record)))
                .cloned()
                .collect(),
            season_target: self.season_target,
        }
    }

    /// Records within ± `window_days` of `target`, over the `years_back`
    /// seasons ending with `reference_year`.
    #[must_use]
    pub fn windowed(
        &self,
        target: TargetDate,
        window_days: u32,
        years_back: u32,
        reference_year: i32,
    ) -> Sample {
        let earliest = reference_year
            .saturating_sub(i32::try_from(years_back).unwrap_or(i32::MAX))
            .saturating_add(1);
        let records = self
            .records
            .iter()
            .filter(|record| {
                target
                    .nearest_occurrence(record.date)
                    .is_some_and(|(anchor, distance)| {
                        distance <= i64::from(window_days)
                            && (earliest..=reference_year).contains(&anchor.year())
                    })
            })
            .cloned()
            .collect();
        Sample {
            records,
            season_target: Some(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(y: i32, m: u32, d: u32, tmax: f64) -> DailyRecord {
        DailyRecord {
            temperature_max: Some(tmax),
            ..DailyRecord::empty(date(y, m, d))
        }
    }

    #[test]
    fn test_sample_is_sorted_by_date() {
        let sample = Sample::new(vec![
            record(2022, 7, 4, 30.0),
            record(2020, 7, 4, 31.0),
            record(2021, 7, 4, 32.0),
        ]);
        let years: Vec<i32> = sample.records().iter().map(DailyRecord::year).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
    }

    #[test]
    fn test_values_keep_absent_entries() {
        let mut dry = DailyRecord::empty(date(2020, 7, 5));
        dry.precipitation = Some(0.0);
        let sample = Sample::new(vec![record(2020, 7, 4, 30.0), dry]);

        let values: Vec<Option<f64>> = sample.values(Metric::Precipitation).collect();
        assert_eq!(values, vec![None, Some(0.0)]);
        assert_eq!(sample.present_values(Metric::Precipitation), vec![0.0]);
    }

    #[test]
    fn test_has_any_value() {
        assert!(!DailyRecord::empty(date(2020, 1, 1)).has_any_value());
        assert!(record(2020, 1, 1, 5.0).has_any_value());
    }

    #[test]
    fn test_target_date_rejects_invalid() {
        assert!(TargetDate::new(2, 30).is_err());
        assert!(TargetDate::new(13, 1).is_err());
        assert!(TargetDate::new(2, 29).is_ok());
    }

    #[test]
    fn test_leap_day_falls_back_to_feb_28() {
        let target = TargetDate::new(2, 29).unwrap();
        assert_eq!(target.in_year(2023), Some(date(2023, 2, 28)));
        assert_eq!(target.in_year(2024), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_window_wraps_year_boundary() {
        let target = TargetDate::new(1, 2).unwrap();
        assert!(target.within_window(date(2021, 12, 30), 3));
        assert!(!target.within_window(date(2021, 12, 29), 3));
        assert!(target.within_window(date(2022, 1, 5), 3));
    }

    #[test]
    fn test_windowed_limits_days_and_years() {
        let target = TargetDate::new(7, 4).unwrap();
        let sample = Sample::new(vec![
            record(2000, 7, 4, 30.0),
            record(2016, 7, 4, 30.0),
            record(2016, 7, 20, 30.0),
            record(2025, 7, 1, 30.0),
            record(2025, 7, 11, 30.0),
        ]);

        let windowed = sample.windowed(target, 7, 10, 2025);
        let dates: Vec<NaiveDate> = windowed.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2016, 7, 4), date(2025, 7, 1), date(2025, 7, 11)]);
    }

    #[test]
    fn test_filter_years() {
        let sample = Sample::new(vec![record(2010, 7, 4, 30.0), record(2020, 7, 4, 31.0)]);
        let recent = sample.filter_years(|year| year >= 2015);
        assert_eq!(recent.len(), 1);
        assert_eq!(sample.distinct_years().len(), 2);
    }

    #[test]
    fn test_windowed_groups_by_season() {
        let target = TargetDate::new(1, 1).unwrap();
        let sample = Sample::new(vec![
            record(2015, 12, 30, -5.0),
            record(2016, 1, 1, 2.0),
            record(2016, 12, 30, -5.0),
            record(2017, 1, 1, 2.0),
        ]);

        let windowed = sample.windowed(target, 3, 10, 2017);
        assert_eq!(windowed.season_of(&record(2015, 12, 30, -5.0)), 2016);
        assert_eq!(
            windowed.distinct_years().into_iter().collect::<Vec<_>>(),
            vec![2016, 2017]
        );
        assert_eq!(windowed.filter_years(|season| season == 2016).len(), 2);

        // Without a target the calendar year is used
        assert_eq!(sample.distinct_years().len(), 3);
    }
}
