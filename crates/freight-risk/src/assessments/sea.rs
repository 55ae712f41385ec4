use serde::{Deserialize, Serialize};
use tracing::info;

use super::factors::safety_signal;
use super::{prompts, require_place, AssessmentError, AssessmentService};
use crate::integrations::WeatherSnapshot;
use crate::scoring::{RiskInput, RiskResult, SignalScale};

/// Sea-leg judgement for one port or coastal place.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeaAssessment {
    pub place_name: String,
    pub weather: WeatherSnapshot,
    pub assessment: Vec<String>,
    /// Model safety score, -10 (very risky) to 10 (very safe).
    pub safety_score: f64,
    pub recommendation: String,
    pub risk: RiskResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeaAnswer {
    #[serde(default)]
    assessment: Vec<String>,
    risk_score: f64,
    #[serde(default)]
    recommendation: String,
}

impl AssessmentService {
    pub async fn assess_sea(&self, place_name: &str) -> Result<SeaAssessment, AssessmentError> {
        let place_name = require_place("placeName", place_name)?;
        let weather = self.weather.current_by_place(&place_name).await?;

        let answer: SeaAnswer = self.ask(&prompts::sea_outlook(&weather)).await?;
        let signal = safety_signal(answer.risk_score)?;

        let input = RiskInput::new(place_name.clone()).with_raw_signal(signal, SignalScale::Centered);
        let risk = self.engine.score_candidate(&input)?;

        info!(
            place = %place_name,
            safety_score = answer.risk_score,
            risk = risk.risk_percentage,
            level = %risk.risk_level,
            "sea assessment completed"
        );

        Ok(SeaAssessment {
            place_name,
            weather,
            assessment: answer.assessment,
            safety_score: answer.risk_score,
            recommendation: answer.recommendation,
            risk,
        })
    }
}
