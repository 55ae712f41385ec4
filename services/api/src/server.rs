use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProfileRepository, InMemoryVisitRepository, RiskState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use freight_risk::config::AppConfig;
use freight_risk::error::AppError;
use freight_risk::records::RecordsService;
use freight_risk::telemetry;
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

    let risk = RiskState::from_config(&config)?;
    info!(
        suppliers = risk.catalog.len(),
        weight_sets = config.scoring.weight_sets.len(),
        "risk engine configured"
    );

    let records = Arc::new(RecordsService::new(
        Arc::new(InMemoryVisitRepository::default()),
        Arc::new(InMemoryProfileRepository::default()),
    ));

    let app = with_service_routes(records, risk)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "freight risk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
