use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::{ApplicationForm, ApplicationId, BulkStatusUpdate};
use super::repository::ApplicationRepository;
use super::service::{ApplicationService, ApplicationServiceError};
use crate::access::Actor;
use crate::forms::FieldDefinitionStore;
use crate::postings::{PostingId, PostingRepository};

/// Router builder exposing application intake, review, and dashboard endpoints.
pub fn application_router<R, P, F>(service: Arc<ApplicationService<R, P, F>>) -> Router
where
    R: ApplicationRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(create_handler::<R, P, F>))
        .route(
            "/api/v1/applications/:application_id",
            get(get_handler::<R, P, F>).put(save_handler::<R, P, F>),
        )
        .route(
            "/api/v1/applications/:application_id/submit",
            post(submit_handler::<R, P, F>),
        )
        .route("/api/v1/me/applications", get(mine_handler::<R, P, F>))
        .route(
            "/api/v1/postings/:posting_id/applications",
            get(by_posting_handler::<R, P, F>),
        )
        .route(
            "/api/v1/admin/applications/bulk-status",
            post(bulk_status_handler::<R, P, F>),
        )
        .route("/api/v1/admin/dashboard", get(dashboard_handler::<R, P, F>))
        .route(
            "/api/v1/admin/dashboard/trends",
            get(trends_handler::<R, P, F>),
        )
        .with_state(service)
}

impl IntoResponse for ApplicationServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let payload = match &self {
            ApplicationServiceError::SubmissionBlocked(assessment) => json!({
                "error": self.to_string(),
                "errors": assessment.errors(),
                "outcomes": assessment.outcomes,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(payload)).into_response()
    }
}

pub(crate) async fn create_handler<R, P, F>(
    State(service): State<Arc<ApplicationService<R, P, F>>>,
    actor: Actor,
    Json(form): Json<ApplicationForm>,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.create_draft(&actor, form) {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_handler<R, P, F>(
    State(service): State<Arc<ApplicationService<R, P, F>>>,
    actor: Actor,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.get(&actor, &ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn save_handler<R, P, F>(
    State(service): State<Arc<ApplicationService<R, P, F>>>,
    actor: Actor,
    Path(application_id): Path<String>,
    Json(form): Json<ApplicationForm>,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.save_draft(&actor, &ApplicationId(application_id), form) {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn submit_handler<R, P, F>(
    State(service): State<Arc<ApplicationService<R, P, F>>>,
    actor: Actor,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.submit(&actor, &ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, Json(record.summary())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn mine_handler<R, P, F>(
    State(service): State<Arc<ApplicationService<R, P, F>>>,
    actor: Actor,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.list_for_applicant(&actor) {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn by_posting_handler<R, P, F>(
    State(service): State<Arc<ApplicationService<R, P, F>>>,
    actor: Actor,
    Path(posting_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.list_for_posting(&actor, &PostingId(posting_id)) {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn bulk_status_handler<R, P, F>(
    State(service): State<Arc<ApplicationService<R, P, F>>>,
    actor: Actor,
    Json(request): Json<BulkStatusUpdate>,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.bulk_update_status(&actor, request) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn dashboard_handler<R, P, F>(
    State(service): State<Arc<ApplicationService<R, P, F>>>,
    actor: Actor,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.dashboard(&actor) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn trends_handler<R, P, F>(
    State(service): State<Arc<ApplicationService<R, P, F>>>,
    actor: Actor,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    let today = Utc::now().date_naive();
    match service.trends(&actor, today) {
        Ok(points) => (StatusCode::OK, Json(points)).into_response(),
        Err(err) => err.into_response(),
    }
}
