//! Assessments that turn live conditions into engine inputs and factors.
//!
//! The engine stays pure; this layer fetches weather, geocodes places, asks the generative
//! model for structured judgements, converts those into external factors or raw signals,
//! and hands them to [`RiskEngine`].

mod factors;
mod insurance;
mod land;
mod market;
mod prompts;
mod sea;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::integrations::{Geocoder, IntegrationError, TextGenerator, WeatherProvider};
use crate::scoring::{RiskEngine, ScoringError};
use crate::suppliers::SupplierCatalog;

pub use factors::{
    safety_signal, sentiment_factor, weather_factor, MAX_WEATHER_FACTOR, OUTLOOK_SCORE_LIMIT,
};
pub use insurance::{InsuranceRecommendation, InsuranceRecommendations};
pub use land::{LandRouteAssessment, RouteEndpoint};
pub use market::MarketAnalysis;
pub use sea::SeaAssessment;

/// Service composing the engine, the supplier catalog, and the external providers.
pub struct AssessmentService {
    engine: Arc<RiskEngine>,
    catalog: Arc<SupplierCatalog>,
    weather: Arc<dyn WeatherProvider>,
    geocoder: Arc<dyn Geocoder>,
    generator: Arc<dyn TextGenerator>,
}

impl AssessmentService {
    pub fn new(
        engine: Arc<RiskEngine>,
        catalog: Arc<SupplierCatalog>,
        weather: Arc<dyn WeatherProvider>,
        geocoder: Arc<dyn Geocoder>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            engine,
            catalog,
            weather,
            geocoder,
            generator,
        }
    }

    pub fn engine(&self) -> &RiskEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &SupplierCatalog {
        &self.catalog
    }

    async fn ask<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, AssessmentError> {
        let answer = self.generator.generate_json(prompt).await?;
        serde_json::from_value(answer).map_err(|err| AssessmentError::ModelAnswer(err.to_string()))
    }
}

/// Error raised by assessments.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("{field} is required and must not be blank")]
    MissingField { field: &'static str },
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Integration(#[from] IntegrationError),
    #[error("model answer rejected: {0}")]
    ModelAnswer(String),
}

fn require_place(field: &'static str, value: &str) -> Result<String, AssessmentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AssessmentError::MissingField { field });
    }
    Ok(trimmed.to_string())
}
