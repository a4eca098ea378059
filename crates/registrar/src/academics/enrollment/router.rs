use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::CourseId;
use super::eligibility::CompletedCourses;
use super::repository::{CompletionRecordStore, CourseCatalog, PrerequisiteRuleStore, StoreError};
use super::service::{EnrollmentOutcome, EnrollmentService, EnrollmentServiceError};

/// Router builder exposing the eligibility and enrollment endpoints.
pub fn enrollment_router<C, R, S>(service: Arc<EnrollmentService<C, R, S>>) -> Router
where
    C: CourseCatalog + 'static,
    R: PrerequisiteRuleStore + 'static,
    S: CompletionRecordStore + 'static,
{
    Router::new()
        .route("/api/v1/eligibility/check", post(check_handler::<C, R, S>))
        .route("/api/v1/eligibility/batch", post(batch_handler::<C, R, S>))
        .route("/api/v1/enrollments", post(enroll_handler::<C, R, S>))
        .with_state(service)
}

/// Identifiers arrive as opaque strings; unknown ones are simply treated as
/// "not completed".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub course_id: String,
    #[serde(default)]
    pub completed_course_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    #[serde(default)]
    pub completed_course_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub course_id: String,
    #[serde(default)]
    pub completed_course_ids: Vec<String>,
}

fn completed_from(ids: Vec<String>) -> CompletedCourses {
    CompletedCourses::from_ids(ids.into_iter().map(CourseId))
}

pub(crate) async fn check_handler<C, R, S>(
    State(service): State<Arc<EnrollmentService<C, R, S>>>,
    axum::Json(request): axum::Json<CheckRequest>,
) -> Response
where
    C: CourseCatalog + 'static,
    R: PrerequisiteRuleStore + 'static,
    S: CompletionRecordStore + 'static,
{
    let completed = completed_from(request.completed_course_ids);
    match service.check(&CourseId(request.course_id), &completed) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn batch_handler<C, R, S>(
    State(service): State<Arc<EnrollmentService<C, R, S>>>,
    axum::Json(request): axum::Json<BatchRequest>,
) -> Response
where
    C: CourseCatalog + 'static,
    R: PrerequisiteRuleStore + 'static,
    S: CompletionRecordStore + 'static,
{
    let completed = completed_from(request.completed_course_ids);
    match service.batch_report(&completed) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn enroll_handler<C, R, S>(
    State(service): State<Arc<EnrollmentService<C, R, S>>>,
    axum::Json(request): axum::Json<EnrollmentRequest>,
) -> Response
where
    C: CourseCatalog + 'static,
    R: PrerequisiteRuleStore + 'static,
    S: CompletionRecordStore + 'static,
{
    let completed = completed_from(request.completed_course_ids);
    match service.enroll(&CourseId(request.course_id), &completed) {
        Ok(outcome @ EnrollmentOutcome::Enrolled { .. }) => {
            (StatusCode::CREATED, axum::Json(outcome)).into_response()
        }
        Ok(outcome @ EnrollmentOutcome::Rejected { .. }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(outcome)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: EnrollmentServiceError) -> Response {
    let status = match &error {
        EnrollmentServiceError::UnknownCourse(_) => StatusCode::NOT_FOUND,
        EnrollmentServiceError::Store(StoreError::SeatsExhausted) => StatusCode::CONFLICT,
        EnrollmentServiceError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
