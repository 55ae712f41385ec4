use crate::infra::{AppState, RiskState};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use freight_risk::assessments::{
    InsuranceRecommendations, LandRouteAssessment, MarketAnalysis, SeaAssessment,
};
use freight_risk::error::AppError;
use freight_risk::records::{records_router, ProfileRepository, RecordsService, VisitRepository};
use freight_risk::scoring::{apply_external_factors, RiskInput, RiskResult, ScoringBatch};
use freight_risk::suppliers::{analyze_catalog, analyze_supplier, CatalogAnalysis, Supplier};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) candidate: RiskInput,
    #[serde(default)]
    pub(crate) factors: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    pub(crate) candidates: Vec<RiskInput>,
    #[serde(default)]
    pub(crate) factor: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CatalogAnalysisRequest {
    #[serde(default)]
    pub(crate) weather_factor: Option<f64>,
    #[serde(default)]
    pub(crate) sentiment_factor: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationRequest {
    #[serde(alias = "location1")]
    pub(crate) location: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LandRouteRequest {
    #[serde(alias = "locationA")]
    pub(crate) origin: String,
    #[serde(alias = "locationB")]
    pub(crate) destination: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SeaRequest {
    pub(crate) place_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SupplierListing {
    pub(crate) suppliers: Vec<Supplier>,
    pub(crate) total_suppliers: usize,
}

pub(crate) fn with_service_routes<V, P>(
    records: Arc<RecordsService<V, P>>,
    risk: RiskState,
) -> Router
where
    V: VisitRepository + 'static,
    P: ProfileRepository + 'static,
{
    records_router(records)
        .merge(risk_router(risk))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) fn risk_router(state: RiskState) -> Router {
    Router::new()
        .route("/api/v1/risk/score", post(score_endpoint))
        .route("/api/v1/risk/batch", post(batch_endpoint))
        .route("/api/v1/suppliers", get(suppliers_endpoint))
        .route("/api/v1/suppliers/analysis", post(catalog_analysis_endpoint))
        .route(
            "/api/v1/suppliers/market-analysis",
            post(market_analysis_endpoint),
        )
        .route(
            "/api/v1/suppliers/:name/analysis",
            get(supplier_analysis_endpoint),
        )
        .route("/api/v1/routes/land/assess", post(land_route_endpoint))
        .route("/api/v1/routes/sea/assess", post(sea_route_endpoint))
        .route(
            "/api/v1/insurance/recommendations",
            post(insurance_endpoint),
        )
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn score_endpoint(
    State(state): State<RiskState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<RiskResult>, AppError> {
    let result = state.engine.score_candidate(&request.candidate)?;
    Ok(Json(apply_external_factors(result, &request.factors)?))
}

pub(crate) async fn batch_endpoint(
    State(state): State<RiskState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<ScoringBatch>, AppError> {
    let batch = state.engine.score_batch(&request.candidates)?;
    let batch = match request.factor {
        Some(factor) => batch.apply_external_factor(factor)?,
        None => batch,
    };
    Ok(Json(batch))
}

pub(crate) async fn suppliers_endpoint(State(state): State<RiskState>) -> Json<SupplierListing> {
    let suppliers = state.catalog.suppliers().to_vec();
    Json(SupplierListing {
        total_suppliers: suppliers.len(),
        suppliers,
    })
}

pub(crate) async fn catalog_analysis_endpoint(
    State(state): State<RiskState>,
    body: Bytes,
) -> Result<Json<CatalogAnalysis>, AppError> {
    let request = parse_optional_body::<CatalogAnalysisRequest>(&body)?;

    let mut analysis = analyze_catalog(&state.engine, &state.catalog)?;
    for factor in [request.weather_factor, request.sentiment_factor]
        .into_iter()
        .flatten()
    {
        analysis = analysis.with_external_factor(factor)?;
    }
    Ok(Json(analysis))
}

/// An absent or blank body means defaults; anything else must parse.
fn parse_optional_body<T>(body: &[u8]) -> Result<T, AppError>
where
    T: Default + serde::de::DeserializeOwned,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| AppError::InvalidRequest(err.to_string()))
}

pub(crate) async fn supplier_analysis_endpoint(
    State(state): State<RiskState>,
    Path(name): Path<String>,
) -> Result<Json<RiskResult>, AppError> {
    analyze_supplier(&state.engine, &state.catalog, &name)?
        .map(Json)
        .ok_or(AppError::SupplierNotFound(name))
}

pub(crate) async fn market_analysis_endpoint(
    State(state): State<RiskState>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<MarketAnalysis>, AppError> {
    Ok(Json(state.assessments.market_analysis(&request.location).await?))
}

pub(crate) async fn land_route_endpoint(
    State(state): State<RiskState>,
    Json(request): Json<LandRouteRequest>,
) -> Result<Json<LandRouteAssessment>, AppError> {
    let assessment = state
        .assessments
        .assess_land_route(&request.origin, &request.destination)
        .await?;
    Ok(Json(assessment))
}

pub(crate) async fn sea_route_endpoint(
    State(state): State<RiskState>,
    Json(request): Json<SeaRequest>,
) -> Result<Json<SeaAssessment>, AppError> {
    Ok(Json(state.assessments.assess_sea(&request.place_name).await?))
}

pub(crate) async fn insurance_endpoint(
    State(state): State<RiskState>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<InsuranceRecommendations>, AppError> {
    let recommendations = state
        .assessments
        .recommend_insurance(&request.location)
        .await?;
    Ok(Json(recommendations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::offline_config;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn risk_state() -> RiskState {
        RiskState::from_config(&offline_config()).expect("state builds")
    }

    fn app_state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    async fn read_json_body(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body readable");
        serde_json::from_slice(&body).expect("json body")
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        post_json_text(uri, &body.to_string())
    }

    fn post_json_text(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let state = app_state(false);
        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn score_endpoint_returns_labelled_result() {
        let request = ScoreRequest {
            candidate: RiskInput::new("Quick Haulers")
                .with_cost(48_000.0)
                .with_rating(7.0)
                .with_review_count(3),
            factors: Vec::new(),
        };

        let Json(result) = score_endpoint(State(risk_state()), Json(request))
            .await
            .expect("scores");

        assert_eq!(result.risk_percentage, 34.0);
        assert_eq!(result.color_code, "lightgreen");
    }

    #[tokio::test]
    async fn score_route_serializes_camel_case_payload() {
        let response = risk_router(risk_state())
            .oneshot(post_json(
                "/api/v1/risk/score",
                json!({
                    "candidate": {
                        "label": "Harbor forecast",
                        "rawSignal": { "value": -40, "scale": "centered" }
                    },
                    "factors": [1.5]
                }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["riskPercentage"], 45.0);
        assert_eq!(body["riskLevel"], "Moderate Risk");
        assert_eq!(body["appliedFactors"], json!([1.5]));
    }

    #[tokio::test]
    async fn empty_batch_is_a_bad_request() {
        let response = risk_router(risk_state())
            .oneshot(post_json("/api/v1/risk/batch", json!({ "candidates": [] })))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert_eq!(body["error"], "batch scoring requires at least one candidate");
    }

    #[tokio::test]
    async fn batch_route_names_invalid_position() {
        let response = risk_router(risk_state())
            .oneshot(post_json(
                "/api/v1/risk/batch",
                json!({
                    "candidates": [
                        { "label": "A", "cost": 50000, "rating": 5, "reviewCount": 2 },
                        { "label": "B", "cost": 50000, "rating": 11, "reviewCount": 2 }
                    ]
                }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        let message = body["error"].as_str().expect("error message");
        assert!(message.contains("position 1"));
    }

    #[tokio::test]
    async fn supplier_analysis_routes_cover_catalog_and_lookup() {
        let router = risk_router(risk_state());

        let response = router
            .clone()
            .oneshot(post_json("/api/v1/suppliers/analysis", json!({})))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["batch"]["bestCandidate"]["label"], "Quick Haulers");
        assert_eq!(body["ranking"][0], "Quick Haulers");

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/v1/suppliers/Speedy%20Logistics/analysis")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["riskPercentage"], 68.5);

        let response = router
            .oneshot(
                Request::get("/api/v1/suppliers/Ghost%20Freight/analysis")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn catalog_analysis_accepts_factors() {
        let Json(analysis) = catalog_analysis_endpoint(
            State(risk_state()),
            Bytes::from_static(br#"{"weatherFactor": 1.2}"#),
        )
        .await
        .expect("analysis");

        assert_eq!(analysis.batch.best_candidate.risk_percentage, 40.8);

        let Json(unadjusted) = catalog_analysis_endpoint(State(risk_state()), Bytes::new())
            .await
            .expect("analysis without body");
        assert_eq!(unadjusted.batch.best_candidate.risk_percentage, 34.0);
    }

    #[tokio::test]
    async fn malformed_catalog_analysis_body_is_a_bad_request() {
        for body in [r#"{"weatherFactor": "severe"}"#, "{not json"] {
            let response = risk_router(risk_state())
                .oneshot(post_json_text("/api/v1/suppliers/analysis", body))
                .await
                .expect("router responds");

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let payload = read_json_body(response).await;
            let message = payload["error"].as_str().expect("error message");
            assert!(message.starts_with("invalid request body"));
        }
    }

    #[tokio::test]
    async fn assessments_without_credentials_are_unavailable() {
        let response = risk_router(risk_state())
            .oneshot(post_json(
                "/api/v1/suppliers/market-analysis",
                json!({ "location": "London" }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn blank_sea_place_is_a_bad_request() {
        let response = risk_router(risk_state())
            .oneshot(post_json(
                "/api/v1/routes/sea/assess",
                json!({ "placeName": "  " }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn insurance_accepts_legacy_location_field() {
        let response = risk_router(risk_state())
            .oneshot(post_json(
                "/api/v1/insurance/recommendations",
                json!({ "location1": "Mumbai" }),
            ))
            .await
            .expect("router responds");

        // Field is accepted; the keyless model client then reports itself unavailable.
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn suppliers_endpoint_lists_catalog() {
        let Json(listing) = suppliers_endpoint(State(risk_state())).await;

        assert_eq!(listing.total_suppliers, 4);
        assert_eq!(listing.suppliers[0].name, "Reliable Transports");
    }
}
