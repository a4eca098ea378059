use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use registrar::academics::enrollment::EnrollmentService;
use registrar::config::AppConfig;
use registrar::error::AppError;
use registrar::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{
    demo_catalog, AppState, InMemoryCourseCatalog, InMemoryRecordStore, InMemoryRuleStore,
};
use crate::routes::with_enrollment_routes;

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (courses, rules) = demo_catalog();
    let enrollment_service = Arc::new(EnrollmentService::new(
        Arc::new(InMemoryCourseCatalog::seeded(courses)),
        Arc::new(InMemoryRuleStore::seeded(rules)),
        Arc::new(InMemoryRecordStore::default()),
        config.policy.eligibility_config(),
    ));

    let app = with_enrollment_routes(enrollment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "course eligibility service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
