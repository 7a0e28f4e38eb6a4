use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDirectoryRepository, LoggingMailSender};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use certwatch::config::AppConfig;
use certwatch::error::AppError;
use certwatch::telemetry;
use certwatch::workflows::notifications::{ComplianceService, ScheduleGate};
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

    let repository = Arc::new(InMemoryDirectoryRepository::default());
    let mailer = Arc::new(LoggingMailSender);
    let service = Arc::new(ComplianceService::new(repository, mailer));
    let gate = ScheduleGate::new(config.notifications.cron_secret.clone());

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(Extension(gate))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "compliance tracker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
