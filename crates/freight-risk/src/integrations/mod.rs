//! Clients for the external services that feed the scoring engine: current weather,
//! geocoding, and generative text. Each concern sits behind a trait so assessments can be
//! exercised with in-process fakes.

mod gemini;
mod openweather;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use gemini::GeminiClient;
pub use openweather::OpenWeatherClient;

/// Current conditions at a place, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f64,
    pub wind_speed_ms: f64,
    /// OpenWeather condition id (2xx thunderstorm, 3xx drizzle, 5xx rain, 6xx snow, 7xx atmosphere).
    pub condition_code: u16,
    pub condition: String,
    pub description: String,
}

/// A resolved place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_by_place(&self, place: &str) -> Result<WeatherSnapshot, IntegrationError>;

    async fn current_at(&self, point: &GeoPoint) -> Result<WeatherSnapshot, IntegrationError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, place: &str) -> Result<GeoPoint, IntegrationError>;
}

/// Generative model constrained to answer with a JSON document.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, IntegrationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    #[error("{service} credentials are not configured")]
    MissingCredentials { service: &'static str },
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} responded with status {status}: {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },
    #[error("{service} returned an unexpected payload: {detail}")]
    Payload {
        service: &'static str,
        detail: String,
    },
    #[error("{service} has no match for '{query}'")]
    NotFound {
        service: &'static str,
        query: String,
    },
}

/// Connection settings shared by the HTTP clients.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

pub(crate) fn build_http_client(
    service: &'static str,
    timeout: Duration,
) -> Result<reqwest::Client, IntegrationError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent("freight-risk/0.1")
        .build()
        .map_err(|source| IntegrationError::Transport { service, source })
}

/// Strip an optional Markdown code fence around a model's JSON answer.
pub(crate) fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
