use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ReplyRequest, TicketId, TicketRequest};
use super::repository::TicketRepository;
use super::service::{HelpdeskService, HelpdeskServiceError};
use crate::access::Actor;

/// Router builder exposing the helpdesk ticket endpoints.
pub fn helpdesk_router<T>(service: Arc<HelpdeskService<T>>) -> Router
where
    T: TicketRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/helpdesk/tickets",
            get(list_handler::<T>).post(create_handler::<T>),
        )
        .route("/api/v1/helpdesk/tickets/:ticket_id", get(get_handler::<T>))
        .route(
            "/api/v1/helpdesk/tickets/:ticket_id/replies",
            post(reply_handler::<T>),
        )
        .route(
            "/api/v1/helpdesk/tickets/:ticket_id/resolve",
            post(resolve_handler::<T>),
        )
        .route(
            "/api/v1/helpdesk/tickets/:ticket_id/close",
            post(close_handler::<T>),
        )
        .with_state(service)
}

impl IntoResponse for HelpdeskServiceError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.to_string() });
        (self.status(), Json(payload)).into_response()
    }
}

pub(crate) async fn list_handler<T>(
    State(service): State<Arc<HelpdeskService<T>>>,
    actor: Actor,
) -> Response
where
    T: TicketRepository + 'static,
{
    match service.list(&actor) {
        Ok(tickets) => (StatusCode::OK, Json(tickets)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_handler<T>(
    State(service): State<Arc<HelpdeskService<T>>>,
    actor: Actor,
    Json(request): Json<TicketRequest>,
) -> Response
where
    T: TicketRepository + 'static,
{
    match service.create(&actor, request) {
        Ok(ticket) => (StatusCode::CREATED, Json(ticket)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_handler<T>(
    State(service): State<Arc<HelpdeskService<T>>>,
    actor: Actor,
    Path(ticket_id): Path<String>,
) -> Response
where
    T: TicketRepository + 'static,
{
    match service.get(&actor, &TicketId(ticket_id)) {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn reply_handler<T>(
    State(service): State<Arc<HelpdeskService<T>>>,
    actor: Actor,
    Path(ticket_id): Path<String>,
    Json(request): Json<ReplyRequest>,
) -> Response
where
    T: TicketRepository + 'static,
{
    match service.reply(&actor, &TicketId(ticket_id), request) {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn resolve_handler<T>(
    State(service): State<Arc<HelpdeskService<T>>>,
    actor: Actor,
    Path(ticket_id): Path<String>,
) -> Response
where
    T: TicketRepository + 'static,
{
    match service.resolve(&actor, &TicketId(ticket_id)) {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn close_handler<T>(
    State(service): State<Arc<HelpdeskService<T>>>,
    actor: Actor,
    Path(ticket_id): Path<String>,
) -> Response
where
    T: TicketRepository + 'static,
{
    match service.close(&actor, &TicketId(ticket_id)) {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(err) => err.into_response(),
    }
}
