use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::factors::{sentiment_factor, weather_factor};
use super::{prompts, require_place, AssessmentError, AssessmentService};
use crate::integrations::WeatherSnapshot;
use crate::suppliers::CatalogAnalysis;

/// Catalog analysis adjusted for local weather and the logistics outlook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub location: String,
    pub weather: WeatherSnapshot,
    pub weather_factor: f64,
    pub outlook_score: f64,
    pub outlook_summary: String,
    pub sentiment_factor: f64,
    pub analysis: CatalogAnalysis,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutlookAnswer {
    outlook_score: f64,
    #[serde(default)]
    summary: String,
}

impl AssessmentService {
    pub async fn market_analysis(&self, location: &str) -> Result<MarketAnalysis, AssessmentError> {
        let location = require_place("location", location)?;
        let weather = self.weather.current_by_place(&location).await?;
        let weather_factor = weather_factor(&weather);

        let outlook: OutlookAnswer = self.ask(&prompts::market_outlook(&location, &weather)).await?;
        let sentiment_factor = sentiment_factor(outlook.outlook_score)?;

        let batch = self
            .engine
            .score_batch(&self.catalog.risk_inputs())?
            .apply_external_factor(weather_factor)?
            .apply_external_factor(sentiment_factor)?;
        let analysis = CatalogAnalysis::from_batch(batch, Utc::now());

        info!(
            location = %location,
            weather_factor,
            sentiment_factor,
            best = %analysis.batch.best_candidate.label,
            "market analysis completed"
        );

        Ok(MarketAnalysis {
            location,
            weather,
            weather_factor,
            outlook_score: outlook.outlook_score,
            outlook_summary: outlook.summary,
            sentiment_factor,
            analysis,
        })
    }
}
