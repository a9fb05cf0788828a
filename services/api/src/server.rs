use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryApplicationRepository, InMemoryPostingRepository, InMemoryTicketRepository,
};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit_portal::applications::ApplicationService;
use recruit_portal::config::AppConfig;
use recruit_portal::error::AppError;
use recruit_portal::forms::InMemoryFieldStore;
use recruit_portal::helpdesk::HelpdeskService;
use recruit_portal::postings::PostingService;
use recruit_portal::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let postings = Arc::new(InMemoryPostingRepository::default());
    let fields = Arc::new(InMemoryFieldStore::new());
    let applications = Arc::new(InMemoryApplicationRepository::default());

    let posting_service = Arc::new(PostingService::new(postings.clone(), fields.clone()));
    let application_service = Arc::new(ApplicationService::new(
        applications,
        postings,
        fields,
        &config.portal,
    ));
    let helpdesk_service = Arc::new(HelpdeskService::new(Arc::new(
        InMemoryTicketRepository::default(),
    )));

    let app = with_portal_routes(posting_service, application_service, helpdesk_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        prefix = %config.portal.application_prefix,
        "recruitment portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
