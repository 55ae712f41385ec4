use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::factors::weather_factor;
use super::{require_place, AssessmentError, AssessmentService};
use crate::integrations::{GeoPoint, WeatherSnapshot};
use crate::suppliers::CatalogAnalysis;

/// Conditions at one end of a route.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEndpoint {
    pub place: GeoPoint,
    pub weather: WeatherSnapshot,
    pub weather_factor: f64,
}

/// Supplier ranking for a road leg, adjusted by the worse of the two endpoints' weather.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandRouteAssessment {
    pub origin: RouteEndpoint,
    pub destination: RouteEndpoint,
    pub route_weather_factor: f64,
    pub analysis: CatalogAnalysis,
}

impl AssessmentService {
    pub async fn assess_land_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<LandRouteAssessment, AssessmentError> {
        let origin = require_place("origin", origin)?;
        let destination = require_place("destination", destination)?;

        let origin_place = self.geocoder.locate(&origin).await?;
        let destination_place = self.geocoder.locate(&destination).await?;

        let origin = self.endpoint(origin_place).await?;
        let destination = self.endpoint(destination_place).await?;
        let route_weather_factor = origin.weather_factor.max(destination.weather_factor);

        let batch = self
            .engine
            .score_batch(&self.catalog.risk_inputs())?
            .apply_external_factor(route_weather_factor)?;
        let analysis = CatalogAnalysis::from_batch(batch, Utc::now());

        info!(
            origin = %origin.place.name,
            destination = %destination.place.name,
            route_weather_factor,
            best = %analysis.batch.best_candidate.label,
            "land route assessment completed"
        );

        Ok(LandRouteAssessment {
            origin,
            destination,
            route_weather_factor,
            analysis,
        })
    }

    async fn endpoint(&self, place: GeoPoint) -> Result<RouteEndpoint, AssessmentError> {
        let weather = self.weather.current_at(&place).await?;
        let weather_factor = weather_factor(&weather);
        Ok(RouteEndpoint {
            place,
            weather,
            weather_factor,
        })
    }
}
