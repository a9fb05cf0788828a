use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{FieldDraft, PostingDraft, PostingId, PostingStatus};
use super::repository::PostingRepository;
use super::service::{PostingService, PostingServiceError};
use crate::access::Actor;
use crate::forms::{FieldDefinitionStore, FieldId};

/// Status change request body.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChange {
    pub status: PostingStatus,
    #[serde(default)]
    pub final_result_url: Option<String>,
}

/// Router builder exposing posting authoring and browsing endpoints.
pub fn posting_router<P, F>(service: Arc<PostingService<P, F>>) -> Router
where
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/postings",
            get(list_handler::<P, F>).post(create_handler::<P, F>),
        )
        .route(
            "/api/v1/postings/:posting_id",
            get(get_handler::<P, F>)
                .put(update_handler::<P, F>)
                .delete(delete_handler::<P, F>),
        )
        .route(
            "/api/v1/postings/:posting_id/fields",
            put(define_fields_handler::<P, F>),
        )
        .route(
            "/api/v1/postings/:posting_id/fields/:field_id",
            delete(remove_field_handler::<P, F>),
        )
        .route(
            "/api/v1/postings/:posting_id/status",
            patch(status_handler::<P, F>),
        )
        .with_state(service)
}

impl IntoResponse for PostingServiceError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.to_string() });
        (self.status(), Json(payload)).into_response()
    }
}

pub(crate) async fn list_handler<P, F>(
    State(service): State<Arc<PostingService<P, F>>>,
    actor: Actor,
) -> Response
where
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.list(&actor) {
        Ok(postings) => (StatusCode::OK, Json(postings)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_handler<P, F>(
    State(service): State<Arc<PostingService<P, F>>>,
    actor: Actor,
    Json(draft): Json<PostingDraft>,
) -> Response
where
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.create(&actor, draft) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_handler<P, F>(
    State(service): State<Arc<PostingService<P, F>>>,
    actor: Actor,
    Path(posting_id): Path<String>,
) -> Response
where
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.get(&actor, &PostingId(posting_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_handler<P, F>(
    State(service): State<Arc<PostingService<P, F>>>,
    actor: Actor,
    Path(posting_id): Path<String>,
    Json(draft): Json<PostingDraft>,
) -> Response
where
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.update(&actor, &PostingId(posting_id), draft) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_handler<P, F>(
    State(service): State<Arc<PostingService<P, F>>>,
    actor: Actor,
    Path(posting_id): Path<String>,
) -> Response
where
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.delete(&actor, &PostingId(posting_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn define_fields_handler<P, F>(
    State(service): State<Arc<PostingService<P, F>>>,
    actor: Actor,
    Path(posting_id): Path<String>,
    Json(fields): Json<Vec<FieldDraft>>,
) -> Response
where
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.define_fields(&actor, &PostingId(posting_id), fields) {
        Ok(schema) => (StatusCode::OK, Json(schema)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn remove_field_handler<P, F>(
    State(service): State<Arc<PostingService<P, F>>>,
    actor: Actor,
    Path((posting_id, field_id)): Path<(String, String)>,
) -> Response
where
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.remove_field(&actor, &PostingId(posting_id), &FieldId(field_id)) {
        Ok(schema) => (StatusCode::OK, Json(schema)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn status_handler<P, F>(
    State(service): State<Arc<PostingService<P, F>>>,
    actor: Actor,
    Path(posting_id): Path<String>,
    Json(change): Json<StatusChange>,
) -> Response
where
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    match service.update_status(
        &actor,
        &PostingId(posting_id),
        change.status,
        change.final_result_url,
    ) {
        Ok(posting) => (StatusCode::OK, Json(posting)).into_response(),
        Err(err) => err.into_response(),
    }
}
