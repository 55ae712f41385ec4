use super::AssessmentError;
use crate::integrations::WeatherSnapshot;

pub const MAX_WEATHER_FACTOR: f64 = 2.0;

/// Outlook and safety scores from the model are bounded to `[-10, 10]`.
pub const OUTLOOK_SCORE_LIMIT: f64 = 10.0;

const STRONG_WIND_MS: f64 = 17.0;
const FRESH_WIND_MS: f64 = 10.0;
const COLD_LIMIT_C: f64 = -10.0;
const HEAT_LIMIT_C: f64 = 40.0;

/// Severity multiplier for current conditions: 1.0 in calm weather, capped at 2.0.
pub fn weather_factor(snapshot: &WeatherSnapshot) -> f64 {
    let condition: f64 = match snapshot.condition_code {
        200..=299 => 0.5,
        600..=699 => 0.35,
        300..=399 | 500..=599 => 0.2,
        // sand, dust, volcanic ash, squalls, tornado
        751 | 761 | 762 | 771 | 781 => 0.4,
        _ => 0.0,
    };

    let wind: f64 = if snapshot.wind_speed_ms >= STRONG_WIND_MS {
        0.3
    } else if snapshot.wind_speed_ms >= FRESH_WIND_MS {
        0.15
    } else {
        0.0
    };

    let temperature: f64 =
        if snapshot.temperature_c < COLD_LIMIT_C || snapshot.temperature_c > HEAT_LIMIT_C {
            0.1
        } else {
            0.0
        };

    (1.0 + condition + wind + temperature).min(MAX_WEATHER_FACTOR)
}

/// Logistics outlook in `[-10, 10]` to a multiplier in `[0.5, 1.5]`; a gloomy outlook raises risk.
pub fn sentiment_factor(outlook_score: f64) -> Result<f64, AssessmentError> {
    let score = bounded_score("outlookScore", outlook_score)?;
    Ok(1.0 - score / (2.0 * OUTLOOK_SCORE_LIMIT))
}

/// Safety score (-10 very risky, +10 very safe) to a centered raw signal in `[-100, 100]`.
pub fn safety_signal(safety_score: f64) -> Result<f64, AssessmentError> {
    let score = bounded_score("riskScore", safety_score)?;
    Ok(-score * 10.0)
}

fn bounded_score(field: &str, score: f64) -> Result<f64, AssessmentError> {
    if !score.is_finite() || score.abs() > OUTLOOK_SCORE_LIMIT {
        return Err(AssessmentError::ModelAnswer(format!(
            "{field} {score} is outside [-{OUTLOOK_SCORE_LIMIT}, {OUTLOOK_SCORE_LIMIT}]"
        )));
    }
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(condition_code: u16, wind_speed_ms: f64, temperature_c: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            location: "Rotterdam".to_string(),
            latitude: 51.92,
            longitude: 4.48,
            temperature_c,
            wind_speed_ms,
            condition_code,
            condition: "Test".to_string(),
            description: "test conditions".to_string(),
        }
    }

    #[test]
    fn clear_calm_weather_is_neutral() {
        assert_eq!(weather_factor(&snapshot(800, 3.0, 18.0)), 1.0);
    }

    #[test]
    fn conditions_wind_and_temperature_accumulate() {
        let rain = weather_factor(&snapshot(501, 4.0, 12.0));
        assert!((rain - 1.2).abs() < 1e-9);

        let storm = weather_factor(&snapshot(211, 18.5, 45.0));
        assert!((storm - 1.9).abs() < 1e-9);

        let breezy_snow = weather_factor(&snapshot(601, 12.0, -15.0));
        assert!((breezy_snow - 1.6).abs() < 1e-9);

        let tornado = weather_factor(&snapshot(781, 0.0, 20.0));
        assert!((tornado - 1.4).abs() < 1e-9);
    }

    #[test]
    fn sentiment_maps_outlook_onto_half_to_one_and_a_half() {
        assert_eq!(sentiment_factor(0.0).expect("valid"), 1.0);
        assert_eq!(sentiment_factor(10.0).expect("valid"), 0.5);
        assert_eq!(sentiment_factor(-10.0).expect("valid"), 1.5);
        assert!(sentiment_factor(10.5).is_err());
        assert!(sentiment_factor(f64::NAN).is_err());
    }

    #[test]
    fn safety_score_inverts_onto_centered_signal() {
        assert_eq!(safety_signal(-10.0).expect("valid"), 100.0);
        assert_eq!(safety_signal(4.0).expect("valid"), -40.0);
        assert!(matches!(
            safety_signal(-11.0),
            Err(AssessmentError::ModelAnswer(_))
        ));
    }
}
