use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    build_http_client, GeoPoint, Geocoder, HttpSettings, IntegrationError, WeatherProvider,
    WeatherSnapshot,
};

const SERVICE: &str = "OpenWeather";

/// OpenWeather current-weather and direct-geocoding client (one API key covers both).
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    weather_base_url: String,
    geocoding_base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(
        settings: HttpSettings,
        geocoding_base_url: impl Into<String>,
    ) -> Result<Self, IntegrationError> {
        Ok(Self {
            client: build_http_client(SERVICE, settings.timeout)?,
            weather_base_url: settings.base_url.trim_end_matches('/').to_string(),
            geocoding_base_url: geocoding_base_url.into().trim_end_matches('/').to_string(),
            api_key: settings.api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        subject: &str,
    ) -> Result<T, IntegrationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(IntegrationError::MissingCredentials { service: SERVICE })?;

        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("appid", api_key)])
            .send()
            .await
            .map_err(|source| IntegrationError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(IntegrationError::NotFound {
                service: SERVICE,
                query: subject.to_string(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IntegrationError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| IntegrationError::Payload {
                service: SERVICE,
                detail: err.to_string(),
            })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_by_place(&self, place: &str) -> Result<WeatherSnapshot, IntegrationError> {
        tracing::debug!(place, "fetching current weather by place name");
        let url = format!("{}/weather", self.weather_base_url);
        let query = [("q", place.to_string()), ("units", "metric".to_string())];
        let response: CurrentWeatherResponse = self.get_json(&url, &query, place).await?;
        response.into_snapshot()
    }

    async fn current_at(&self, point: &GeoPoint) -> Result<WeatherSnapshot, IntegrationError> {
        tracing::debug!(
            place = %point.name,
            lat = point.latitude,
            lon = point.longitude,
            "fetching current weather by coordinates"
        );
        let url = format!("{}/weather", self.weather_base_url);
        let query = [
            ("lat", point.latitude.to_string()),
            ("lon", point.longitude.to_string()),
            ("units", "metric".to_string()),
        ];
        let mut snapshot = self
            .get_json::<CurrentWeatherResponse>(&url, &query, &point.name)
            .await?
            .into_snapshot()?;
        if snapshot.location.is_empty() {
            snapshot.location = point.name.clone();
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    async fn locate(&self, place: &str) -> Result<GeoPoint, IntegrationError> {
        tracing::debug!(place, "geocoding place name");
        let url = format!("{}/direct", self.geocoding_base_url);
        let query = [("q", place.to_string()), ("limit", "1".to_string())];
        let matches: Vec<GeocodingEntry> = self.get_json(&url, &query, place).await?;

        matches
            .into_iter()
            .next()
            .map(|entry| GeoPoint {
                name: entry.name,
                country: entry.country,
                latitude: entry.lat,
                longitude: entry.lon,
            })
            .ok_or_else(|| IntegrationError::NotFound {
                service: SERVICE,
                query: place.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    #[serde(default)]
    name: String,
    coord: Coordinates,
    #[serde(default)]
    weather: Vec<Condition>,
    main: MainReadings,
    #[serde(default)]
    wind: Option<Wind>,
}

#[derive(Debug, Deserialize)]
struct Coordinates {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    id: u16,
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodingEntry {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: Option<String>,
}

impl CurrentWeatherResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, IntegrationError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| IntegrationError::Payload {
                service: SERVICE,
                detail: "weather conditions missing".to_string(),
            })?;

        Ok(WeatherSnapshot {
            location: self.name,
            latitude: self.coord.lat,
            longitude: self.coord.lon,
            temperature_c: self.main.temp,
            wind_speed_ms: self.wind.map(|wind| wind.speed).unwrap_or(0.0),
            condition_code: condition.id,
            condition: condition.main,
            description: condition.description,
        })
    }
}
