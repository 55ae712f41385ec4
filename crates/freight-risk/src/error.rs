use crate::assessments::AssessmentError;
use crate::config::ConfigError;
use crate::integrations::IntegrationError;
use crate::scoring::ScoringError;
use crate::suppliers::CatalogError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Catalog(CatalogError),
    Integration(IntegrationError),
    Scoring(ScoringError),
    Assessment(AssessmentError),
    SupplierNotFound(String),
    InvalidRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Scoring(err) => scoring_status(err),
            AppError::Assessment(err) => match err {
                AssessmentError::MissingField { .. } => StatusCode::BAD_REQUEST,
                AssessmentError::Scoring(err) => scoring_status(err),
                AssessmentError::Integration(err) => integration_status(err),
                AssessmentError::ModelAnswer(_) => StatusCode::BAD_GATEWAY,
            },
            AppError::Integration(err) => integration_status(err),
            AppError::SupplierNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn scoring_status(err: &ScoringError) -> StatusCode {
    match err {
        ScoringError::InvalidInput { .. } | ScoringError::EmptyBatch => StatusCode::BAD_REQUEST,
        ScoringError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn integration_status(err: &IntegrationError) -> StatusCode {
    match err {
        IntegrationError::MissingCredentials { .. } => StatusCode::SERVICE_UNAVAILABLE,
        IntegrationError::NotFound { .. } => StatusCode::NOT_FOUND,
        IntegrationError::Transport { .. }
        | IntegrationError::Upstream { .. }
        | IntegrationError::Payload { .. } => StatusCode::BAD_GATEWAY,
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Catalog(err) => write!(f, "catalog error: {}", err),
            AppError::Integration(err) => write!(f, "{}", err),
            AppError::Scoring(err) => write!(f, "{}", err),
            AppError::Assessment(err) => write!(f, "{}", err),
            AppError::SupplierNotFound(name) => write!(f, "supplier '{}' not found", name),
            AppError::InvalidRequest(reason) => write!(f, "invalid request body: {}", reason),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Integration(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Assessment(err) => Some(err),
            AppError::SupplierNotFound(_) | AppError::InvalidRequest(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, %status, "request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<IntegrationError> for AppError {
    fn from(value: IntegrationError) -> Self {
        Self::Integration(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

impl From<AssessmentError> for AppError {
    fn from(value: AssessmentError) -> Self {
        Self::Assessment(value)
    }
}
