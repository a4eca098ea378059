use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use registrar::academics::enrollment::{
    enrollment_router, CompletionRecordStore, CourseCatalog, EnrollmentService,
    PrerequisiteRuleStore,
};
use serde_json::json;

use crate::infra::AppState;

/// Eligibility and enrollment endpoints plus the operational trio.
pub(crate) fn with_enrollment_routes<C, R, S>(
    service: Arc<EnrollmentService<C, R, S>>,
) -> Router
where
    C: CourseCatalog + 'static,
    R: PrerequisiteRuleStore + 'static,
    S: CompletionRecordStore + 'static,
{
    enrollment_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
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

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
