use serde::{Deserialize, Serialize};
use tracing::info;

use super::{prompts, require_place, AssessmentError, AssessmentService};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceRecommendation {
    pub insurance_type: String,
    #[serde(default)]
    pub risks_covered: Vec<String>,
    #[serde(default)]
    pub uniqueness: String,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub why_asset: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceRecommendations {
    pub location: String,
    pub recommendations: Vec<InsuranceRecommendation>,
}

/// Models answer either with the bare array or wrapped in an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecommendationAnswer {
    List(Vec<InsuranceRecommendation>),
    Wrapped {
        recommendations: Vec<InsuranceRecommendation>,
    },
}

impl AssessmentService {
    pub async fn recommend_insurance(
        &self,
        location: &str,
    ) -> Result<InsuranceRecommendations, AssessmentError> {
        let location = require_place("location", location)?;

        let answer: RecommendationAnswer = self.ask(&prompts::insurance(&location)).await?;
        let recommendations = match answer {
            RecommendationAnswer::List(items) => items,
            RecommendationAnswer::Wrapped { recommendations } => recommendations,
        };
        if recommendations.is_empty() {
            return Err(AssessmentError::ModelAnswer(
                "no insurance recommendations returned".to_string(),
            ));
        }

        info!(location = %location, count = recommendations.len(), "insurance recommendations ready");

        Ok(InsuranceRecommendations {
            location,
            recommendations,
        })
    }
}
