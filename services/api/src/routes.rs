use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use recruit_portal::applications::{application_router, ApplicationRepository, ApplicationService};
use recruit_portal::forms::FieldDefinitionStore;
use recruit_portal::helpdesk::{helpdesk_router, HelpdeskService, TicketRepository};
use recruit_portal::postings::{posting_router, PostingRepository, PostingService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_portal_routes<R, P, F, T>(
    postings: Arc<PostingService<P, F>>,
    applications: Arc<ApplicationService<R, P, F>>,
    helpdesk: Arc<HelpdeskService<T>>,
) -> axum::Router
where
    R: ApplicationRepository + 'static,
    T: TicketRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    posting_router(postings)
        .merge(application_router(applications))
        .merge(helpdesk_router(helpdesk))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        InMemoryApplicationRepository, InMemoryPostingRepository, InMemoryTicketRepository,
    };
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use recruit_portal::config::PortalConfig;
    use recruit_portal::forms::InMemoryFieldStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let postings = Arc::new(InMemoryPostingRepository::default());
        let fields = Arc::new(InMemoryFieldStore::new());
        let applications = Arc::new(InMemoryApplicationRepository::default());

        let posting_service = Arc::new(PostingService::new(postings.clone(), fields.clone()));
        let application_service = Arc::new(ApplicationService::new(
            applications,
            postings,
            fields,
            &PortalConfig::default(),
        ));
        let helpdesk_service = Arc::new(HelpdeskService::new(Arc::new(
            InMemoryTicketRepository::default(),
        )));

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        state.readiness.store(ready, Ordering::Release);

        with_portal_routes(posting_service, application_service, helpdesk_service)
            .layer(Extension(state))
    }

    async fn get(router: axum::Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes")
            .status()
    }

    #[tokio::test]
    async fn readiness_reflects_the_flag() {
        assert_eq!(get(app(false), "/ready").await, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(get(app(true), "/ready").await, StatusCode::OK);
        assert_eq!(get(app(false), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn portal_routes_are_mounted() {
        assert_eq!(get(app(true), "/api/v1/postings").await, StatusCode::OK);
        assert_eq!(
            get(app(true), "/api/v1/me/applications").await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get(app(true), "/api/v1/helpdesk/tickets").await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get(app(true), "/metrics").await, StatusCode::OK);
    }
}
