//! Weighted multi-factor risk scoring for outdoor events
//!
//! Scoring is total: every input, including a missing observation or an
//! unknown event key, produces a [`RiskResult`].

use std::fmt;

use serde::Serialize;

use crate::models::{Observation, Sample};

use super::profile::{EventCatalog, EventProfile, RangeFactor, ThresholdFactor};

/// Degrees outside the comfortable range at which temperature risk saturates
const TEMPERATURE_RISK_SCALE_C: f64 = 10.0;
const MAX_FACTOR_RISK: f64 = 100.0;
const IDEAL_BELOW: f64 = 30.0;
const ACCEPTABLE_BELOW: f64 = 60.0;
const MIN_CONFIDENCE: f64 = 60.0;
const CONFIDENCE_LOSS_PER_RISK: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    Rain,
    Wind,
    Temperature,
    Visibility,
    Storm,
}

impl fmt::Display for RiskFactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFactorKind::Rain => write!(f, "Rain"),
            RiskFactorKind::Wind => write!(f, "Wind"),
            RiskFactorKind::Temperature => write!(f, "Temperature"),
            RiskFactorKind::Visibility => write!(f, "Visibility"),
            RiskFactorKind::Storm => write!(f, "Storm"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorStatus {
    WithinLimits,
    Exceeded,
    /// The observation carries no value for this factor
    NoData,
}

/// Contribution of one factor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorRisk {
    pub factor: RiskFactorKind,
    /// 0-100, before weighting
    pub risk: f64,
    pub value: Option<f64>,
    pub status: FactorStatus,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Ideal,
    Acceptable,
    NotRecommended,
    /// No observation to score
    NoData,
    /// The event key is not in the catalog
    InvalidEvent,
}

impl Recommendation {
    #[must_use]
    pub fn from_risk(total_risk: f64) -> Self {
        if total_risk < IDEAL_BELOW {
            Self::Ideal
        } else if total_risk < ACCEPTABLE_BELOW {
            Self::Acceptable
        } else {
            Self::NotRecommended
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ideal => "Ideal ✅",
            Self::Acceptable => "Acceptable ⚠️",
            Self::NotRecommended => "Not Recommended ❌",
            Self::NoData => "No Data",
            Self::InvalidEvent => "Invalid Event",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of scoring an observation against an event profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskResult {
    pub event: Option<String>,
    /// Rounded weighted sum. Individual factors are capped at 100 but the
    /// sum is not, so it can exceed 100 when several factors are extreme.
    pub total_risk: f64,
    pub recommendation: Recommendation,
    /// 0-100
    pub confidence: f64,
    pub factors: Vec<FactorRisk>,
}

impl RiskResult {
    #[must_use]
    pub fn no_data(event: Option<String>) -> Self {
        Self {
            event,
            total_risk: 0.0,
            recommendation: Recommendation::NoData,
            confidence: 0.0,
            factors: Vec::new(),
        }
    }

    #[must_use]
    pub fn invalid_event(key: &str) -> Self {
        Self {
            event: Some(key.to_string()),
            recommendation: Recommendation::InvalidEvent,
            ..Self::no_data(None)
        }
    }

    /// True when the result came from an actual observation
    #[must_use]
    pub fn is_scored(&self) -> bool {
        !matches!(
            self.recommendation,
            Recommendation::NoData | Recommendation::InvalidEvent
        )
    }

    /// Total risk clamped to 0-100 for display
    #[must_use]
    pub fn display_risk(&self) -> f64 {
        self.total_risk.clamp(0.0, 100.0)
    }
}

/// Score `observation` for the catalog entry `event_key`
#[must_use]
pub fn score_event(
    observation: Option<&Observation>,
    event_key: &str,
    catalog: &EventCatalog,
) -> RiskResult {
    let Some(profile) = catalog.get(event_key) else {
        return RiskResult::invalid_event(event_key);
    };
    match observation {
        Some(observation) => score_profile(observation, profile),
        None => RiskResult::no_data(Some(profile.name.clone())),
    }
}

/// Score `observation` against `profile`
#[must_use]
pub fn score_profile(observation: &Observation, profile: &EventProfile) -> RiskResult {
    let factors = &profile.factors;
    let assessed: Vec<FactorRisk> = [
        factors
            .rain
            .map(|f| above(RiskFactorKind::Rain, f, observation.precipitation)),
        factors
            .wind
            .map(|f| above(RiskFactorKind::Wind, f, observation.wind_speed)),
        factors
            .temperature
            .map(|f| outside_range(f, observation.temperature)),
        factors.visibility.map(|f| below(f, observation.visibility)),
        factors
            .storm
            .map(|f| above(RiskFactorKind::Storm, f, observation.storm_probability)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if assessed.iter().all(|f| f.status == FactorStatus::NoData) {
        return RiskResult::no_data(Some(profile.name.clone()));
    }

    let total_risk = assessed
        .iter()
        .filter(|f| f.status == FactorStatus::Exceeded)
        .map(|f| f.risk * f.weight)
        .sum::<f64>()
        .round();

    RiskResult {
        event: Some(profile.name.clone()),
        total_risk,
        recommendation: Recommendation::from_risk(total_risk),
        confidence: (100.0 - CONFIDENCE_LOSS_PER_RISK * total_risk).max(MIN_CONFIDENCE),
        factors: assessed,
    }
}

fn assessment(
    factor: RiskFactorKind,
    weight: f64,
    value: Option<f64>,
    risk: Option<f64>,
) -> FactorRisk {
    let status = match (value, risk) {
        (None, _) => FactorStatus::NoData,
        (Some(_), Some(_)) => FactorStatus::Exceeded,
        (Some(_), None) => FactorStatus::WithinLimits,
    };
    FactorRisk {
        factor,
        risk: risk.unwrap_or(0.0),
        value,
        status,
        weight,
    }
}

fn capped(risk: f64) -> f64 {
    if risk.is_nan() {
        0.0
    } else {
        risk.clamp(0.0, MAX_FACTOR_RISK)
    }
}

fn above(kind: RiskFactorKind, factor: ThresholdFactor, value: Option<f64>) -> FactorRisk {
    let risk = value
        .filter(|v| *v > factor.threshold)
        .map(|v| capped(100.0 * v / factor.threshold));
    assessment(kind, factor.weight, value, risk)
}

fn below(factor: ThresholdFactor, value: Option<f64>) -> FactorRisk {
    let risk = value
        .filter(|v| *v < factor.threshold)
        .map(|v| capped(100.0 * (factor.threshold - v) / factor.threshold));
    assessment(RiskFactorKind::Visibility, factor.weight, value, risk)
}

fn outside_range(factor: RangeFactor, value: Option<f64>) -> FactorRisk {
    let risk = value.and_then(|v| {
        let distance = if v < factor.min {
            factor.min - v
        } else if v > factor.max {
            v - factor.max
        } else {
            return None;
        };
        Some(capped(100.0 * distance / TEMPERATURE_RISK_SCALE_C))
    });
    assessment(RiskFactorKind::Temperature, factor.weight, value, risk)
}

/// How an event would have fared over the days of a sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventClimatology {
    pub event: String,
    /// Days in the sample
    pub days: usize,
    /// Days with enough data to score
    pub scored_days: usize,
    pub ideal_percent: f64,
    pub acceptable_percent: f64,
    pub not_recommended_percent: f64,
    /// Mean raw total risk over scored days; 0 when none were scored
    pub mean_risk: f64,
}

/// Score every day of `sample` against `profile`
#[must_use]
pub fn event_climatology(sample: &Sample, profile: &EventProfile) -> EventClimatology {
    let results: Vec<RiskResult> = sample
        .records()
        .iter()
        .map(|record| score_profile(&Observation::from_record(record), profile))
        .filter(RiskResult::is_scored)
        .collect();

    let scored_days = results.len();
    let share = |wanted: Recommendation| {
        if scored_days == 0 {
            0.0
        } else {
            let n = results.iter().filter(|r| r.recommendation == wanted).count();
            100.0 * n as f64 / scored_days as f64
        }
    };
    let mean_risk = if scored_days == 0 {
        0.0
    } else {
        results.iter().map(|r| r.total_risk).sum::<f64>() / scored_days as f64
    };

    EventClimatology {
        event: profile.name.clone(),
        days: sample.len(),
        scored_days,
        ideal_percent: share(Recommendation::Ideal),
        acceptable_percent: share(Recommendation::Acceptable),
        not_recommended_percent: share(Recommendation::NotRecommended),
        mean_risk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyRecord;
    use crate::risk::profile::RiskFactors;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn wedding() -> EventProfile {
        EventCatalog::default().get("wedding").unwrap().clone()
    }

    #[test]
    fn test_wedding_example() {
        let result = score_profile(&Observation::new(35.0, 3.0, 10.0), &wedding());

        assert_eq!(result.total_risk, 55.0);
        assert_eq!(result.recommendation, Recommendation::Acceptable);
        assert_eq!(result.recommendation.label(), "Acceptable ⚠️");
        assert!((result.confidence - 83.5).abs() < 1e-9);

        let rain = &result.factors[0];
        assert_eq!(rain.factor, RiskFactorKind::Rain);
        assert_eq!(rain.risk, 100.0);
        assert_eq!(rain.status, FactorStatus::Exceeded);

        let wind = &result.factors[1];
        assert_eq!(wind.risk, 0.0);
        assert_eq!(wind.status, FactorStatus::WithinLimits);

        let temperature = &result.factors[2];
        assert!((temperature.risk - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_ideal_conditions() {
        let result = score_profile(&Observation::new(24.0, 0.0, 8.0), &wedding());
        assert_eq!(result.total_risk, 0.0);
        assert_eq!(result.recommendation, Recommendation::Ideal);
        assert_eq!(result.confidence, 100.0);
    }

    #[test]
    fn test_total_is_not_clamped() {
        let profile = EventProfile {
            name: "Fragile".to_string(),
            icon: "🫧".to_string(),
            factors: RiskFactors {
                rain: Some(ThresholdFactor {
                    weight: 1.0,
                    threshold: 1.0,
                }),
                wind: Some(ThresholdFactor {
                    weight: 1.0,
                    threshold: 10.0,
                }),
                ..RiskFactors::default()
            },
        };
        let result = score_profile(&Observation::new(20.0, 50.0, 80.0), &profile);
        assert_eq!(result.total_risk, 200.0);
        assert_eq!(result.display_risk(), 100.0);
        assert_eq!(result.recommendation, Recommendation::NotRecommended);
        assert_eq!(result.confidence, 60.0);
    }

    #[rstest]
    #[case(29.4, Recommendation::Ideal)]
    #[case(30.0, Recommendation::Acceptable)]
    #[case(59.9, Recommendation::Acceptable)]
    #[case(60.0, Recommendation::NotRecommended)]
    fn test_recommendation_cut_points(#[case] risk: f64, #[case] expected: Recommendation) {
        assert_eq!(Recommendation::from_risk(risk), expected);
    }

    #[rstest]
    #[case(10.0, 80.0)]
    #[case(17.0, 10.0)]
    #[case(-20.0, 100.0)]
    fn test_cold_side_temperature_risk(#[case] temperature: f64, #[case] expected: f64) {
        let factor = RangeFactor {
            weight: 1.0,
            min: 18.0,
            max: 30.0,
        };
        let risk = outside_range(factor, Some(temperature));
        assert!((risk.risk - expected).abs() < 1e-9);
    }

    #[test]
    fn test_missing_observation_is_no_data() {
        let result = score_event(None, "wedding", &EventCatalog::default());
        assert_eq!(result.recommendation, Recommendation::NoData);
        assert_eq!(result.total_risk, 0.0);
        assert!(!result.is_scored());
    }

    #[test]
    fn test_unknown_event_is_invalid() {
        let observation = Observation::new(20.0, 0.0, 5.0);
        let result = score_event(Some(&observation), "rodeo", &EventCatalog::default());
        assert_eq!(result.recommendation, Recommendation::InvalidEvent);
        assert_eq!(result.total_risk, 0.0);
        assert_eq!(result.event.as_deref(), Some("rodeo"));
    }

    #[test]
    fn test_empty_observation_is_no_data() {
        let result = score_profile(&Observation::default(), &wedding());
        assert_eq!(result.recommendation, Recommendation::NoData);
    }

    #[test]
    fn test_partial_observation_skips_missing_factors() {
        let observation = Observation {
            precipitation: Some(2.0),
            ..Observation::default()
        };
        let result = score_profile(&observation, &wedding());
        assert_eq!(result.total_risk, 40.0);
        assert_eq!(result.factors[1].status, FactorStatus::NoData);
        assert_eq!(result.factors[2].status, FactorStatus::NoData);
    }

    #[test]
    fn test_visibility_and_storm_factors() {
        let catalog = EventCatalog::default();
        let hiking = catalog.get("hiking").unwrap();
        let observation = Observation {
            visibility: Some(2.5),
            ..Observation::new(15.0, 0.0, 10.0)
        };
        let result = score_profile(&observation, hiking);
        let visibility = result
            .factors
            .iter()
            .find(|f| f.factor == RiskFactorKind::Visibility)
            .unwrap();
        assert!((visibility.risk - 50.0).abs() < 1e-9);
        assert_eq!(result.total_risk, 5.0);

        let camping = catalog.get("camping").unwrap();
        let stormy = Observation {
            storm_probability: Some(40.0),
            ..Observation::new(20.0, 0.0, 10.0)
        };
        let result = score_profile(&stormy, camping);
        assert_eq!(result.total_risk, 10.0);
    }

    #[test]
    fn test_event_climatology() {
        let day = |d: u32, rain: f64| DailyRecord {
            temperature_avg: Some(24.0),
            precipitation: Some(rain),
            wind_speed: Some(5.0),
            ..DailyRecord::empty(NaiveDate::from_ymd_opt(2020, 6, d).unwrap())
        };
        let sample = Sample::new(vec![
            day(1, 0.0),
            day(2, 0.0),
            day(3, 5.0),
            day(4, 0.5),
            DailyRecord {
                humidity: Some(50.0),
                ..DailyRecord::empty(NaiveDate::from_ymd_opt(2020, 6, 5).unwrap())
            },
        ]);

        let climatology = event_climatology(&sample, &wedding());
        assert_eq!(climatology.days, 5);
        assert_eq!(climatology.scored_days, 4);
        assert!((climatology.ideal_percent - 75.0).abs() < 1e-9);
        assert!((climatology.acceptable_percent - 25.0).abs() < 1e-9);
        assert_eq!(climatology.not_recommended_percent, 0.0);
        assert!((climatology.mean_risk - 10.0).abs() < 1e-9);
    }
}
