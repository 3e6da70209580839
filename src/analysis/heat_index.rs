//! Heat index ("feels like") and discomfort probability

use crate::models::Sample;

use super::probability::ProbabilityResult;

/// Average temperature above which a day is evaluated for discomfort (80 °F)
pub const DISCOMFORT_MIN_TEMP_C: f64 = 26.7;

/// Lower validity bound of the Rothfusz regression in Fahrenheit
const ROTHFUSZ_MIN_TEMP_F: f64 = 80.0;

fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Heat index in Celsius using the NWS Rothfusz regression.
///
/// The regression is only defined from 80 °F up; below that the air
/// temperature is returned unchanged.
#[must_use]
pub fn heat_index(temp_c: f64, relative_humidity: f64) -> f64 {
    let t = celsius_to_fahrenheit(temp_c);
    if t < ROTHFUSZ_MIN_TEMP_F {
        return temp_c;
    }
    let rh = relative_humidity;

    let hi = -42.379 + 2.049_015_23 * t + 10.143_331_27 * rh
        - 0.224_755_41 * t * rh
        - 0.006_837_83 * t * t
        - 0.054_817_17 * rh * rh
        + 0.001_228_74 * t * t * rh
        + 0.000_852_82 * t * rh * rh
        - 0.000_001_99 * t * t * rh * rh;

    fahrenheit_to_celsius(hi)
}

/// Probability that the heat index exceeds `threshold` on warm, humid days.
///
/// Only records with an average temperature above 26.7 °C and a present,
/// positive humidity are evaluated. Every other record is left out of both
/// the count and the total rather than being treated as comfortable.
#[must_use]
pub fn discomfort_probability(sample: &Sample, threshold: f64) -> ProbabilityResult {
    let (count, total) = sample
        .records()
        .iter()
        .filter_map(|record| match (record.temperature_avg, record.humidity) {
            (Some(temp), Some(humidity)) if temp > DISCOMFORT_MIN_TEMP_C && humidity > 0.0 => {
                Some(heat_index(temp, humidity))
            }
            _ => None,
        })
        .filter(|hi| hi.is_finite())
        .fold((0usize, 0usize), |(count, total), hi| {
            (count + usize::from(hi > threshold), total + 1)
        });
    ProbabilityResult::from_counts(count, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyRecord;
    use chrono::NaiveDate;

    fn day(d: u32, temp: Option<f64>, humidity: Option<f64>) -> DailyRecord {
        DailyRecord {
            temperature_avg: temp,
            humidity,
            ..DailyRecord::empty(NaiveDate::from_ymd_opt(2020, 7, d).unwrap())
        }
    }

    #[test]
    fn test_heat_index_hot_and_humid() {
        let hi = heat_index(32.0, 70.0);
        assert!(hi > 40.0 && hi < 41.0, "got {hi}");
    }

    #[test]
    fn test_heat_index_below_validity_returns_air_temperature() {
        assert_eq!(heat_index(20.0, 50.0), 20.0);
        assert_eq!(heat_index(-5.0, 90.0), -5.0);
    }

    #[test]
    fn test_heat_index_grows_with_humidity() {
        assert!(heat_index(35.0, 80.0) > heat_index(35.0, 40.0));
    }

    #[test]
    fn test_discomfort_skips_cool_and_dry_days() {
        let sample = Sample::new(vec![
            day(1, Some(32.0), Some(70.0)),
            day(2, Some(28.0), Some(30.0)),
            day(3, Some(20.0), Some(90.0)),
            day(4, Some(35.0), None),
            day(5, Some(35.0), Some(0.0)),
            day(6, None, Some(80.0)),
        ]);

        let result = discomfort_probability(&sample, 32.0);
        assert_eq!(result.total, 2);
        assert_eq!(result.count, 1);
        assert!((result.percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_discomfort_boundary_temperature_excluded() {
        let sample = Sample::new(vec![day(1, Some(DISCOMFORT_MIN_TEMP_C), Some(90.0))]);
        assert_eq!(discomfort_probability(&sample, 0.0), ProbabilityResult::EMPTY);
    }
}
