use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Router,
};
use serde_json::json;

use super::domain::{NewVisit, ProfileSubmission, UserId, VisitId, VisitUpdate};
use super::repository::{ProfileRepository, RepositoryError, VisitRepository};
use super::service::{RecordsError, RecordsService};

/// Header carrying the authenticated caller, set by the gateway in front of the service.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Router builder exposing the visit and profile endpoints.
pub fn records_router<V, P>(service: Arc<RecordsService<V, P>>) -> Router
where
    V: VisitRepository + 'static,
    P: ProfileRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/visits",
            get(list_visits_handler::<V, P>).post(create_visit_handler::<V, P>),
        )
        .route(
            "/api/v1/visits/:visit_id",
            patch(update_visit_handler::<V, P>).delete(delete_visit_handler::<V, P>),
        )
        .route(
            "/api/v1/profile",
            get(profile_handler::<V, P>).post(create_profile_handler::<V, P>),
        )
        .with_state(service)
}

pub(crate) async fn create_visit_handler<V, P>(
    State(service): State<Arc<RecordsService<V, P>>>,
    headers: HeaderMap,
    axum::Json(visit): axum::Json<NewVisit>,
) -> Response
where
    V: VisitRepository + 'static,
    P: ProfileRepository + 'static,
{
    let user_id = match caller(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    match service.create_visit(&user_id, visit) {
        Ok(visit) => (StatusCode::CREATED, axum::Json(visit)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_visits_handler<V, P>(
    State(service): State<Arc<RecordsService<V, P>>>,
    headers: HeaderMap,
) -> Response
where
    V: VisitRepository + 'static,
    P: ProfileRepository + 'static,
{
    let user_id = match caller(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    match service.list_visits(&user_id) {
        Ok(visits) => (StatusCode::OK, axum::Json(json!({ "visits": visits }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_visit_handler<V, P>(
    State(service): State<Arc<RecordsService<V, P>>>,
    headers: HeaderMap,
    Path(visit_id): Path<String>,
    axum::Json(update): axum::Json<VisitUpdate>,
) -> Response
where
    V: VisitRepository + 'static,
    P: ProfileRepository + 'static,
{
    let user_id = match caller(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    match service.update_visit(&user_id, &VisitId(visit_id), update) {
        Ok(visit) => (StatusCode::OK, axum::Json(visit)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_visit_handler<V, P>(
    State(service): State<Arc<RecordsService<V, P>>>,
    headers: HeaderMap,
    Path(visit_id): Path<String>,
) -> Response
where
    V: VisitRepository + 'static,
    P: ProfileRepository + 'static,
{
    let user_id = match caller(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    match service.delete_visit(&user_id, &VisitId(visit_id)) {
        Ok(visit) => {
            let payload = json!({
                "message": "visit deleted",
                "id": visit.id,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_profile_handler<V, P>(
    State(service): State<Arc<RecordsService<V, P>>>,
    headers: HeaderMap,
    axum::Json(submission): axum::Json<ProfileSubmission>,
) -> Response
where
    V: VisitRepository + 'static,
    P: ProfileRepository + 'static,
{
    let user_id = match caller(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    match service.create_profile(&user_id, submission) {
        Ok(profile) => (StatusCode::CREATED, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<V, P>(
    State(service): State<Arc<RecordsService<V, P>>>,
    headers: HeaderMap,
) -> Response
where
    V: VisitRepository + 'static,
    P: ProfileRepository + 'static,
{
    let user_id = match caller(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    match service.profile(&user_id) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

fn caller(headers: &HeaderMap) -> Result<UserId, Response> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| UserId(value.to_string()))
        .ok_or_else(|| {
            let payload = json!({
                "error": format!("missing {USER_ID_HEADER} header"),
            });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        })
}

fn error_response(error: RecordsError) -> Response {
    let status = match &error {
        RecordsError::Validation(_) => StatusCode::BAD_REQUEST,
        RecordsError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RecordsError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        RecordsError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
