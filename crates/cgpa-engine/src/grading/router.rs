use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Course, EvaluationRequest, GradingMode};
use super::error::GradeError;
use super::GradeEngine;
use crate::report::write_csv;

/// Inline projection request for a single course.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionPayload {
    pub course: Course,
    pub target_point: u8,
    #[serde(default)]
    pub default_mode: GradingMode,
}

/// Router builder exposing the grading endpoints.
pub fn grading_router(engine: Arc<GradeEngine>) -> Router {
    Router::new()
        .route("/api/v1/grades/evaluate", post(evaluate_handler))
        .route("/api/v1/grades/evaluate.csv", post(evaluate_csv_handler))
        .route("/api/v1/grades/project", post(project_handler))
        .with_state(engine)
}

pub(crate) async fn evaluate_handler(
    State(engine): State<Arc<GradeEngine>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response {
    match engine.evaluate(&request) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => grade_error_response(&error),
    }
}

pub(crate) async fn evaluate_csv_handler(
    State(engine): State<Arc<GradeEngine>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response {
    let outcome = match engine.evaluate(&request) {
        Ok(outcome) => outcome,
        Err(error) => return grade_error_response(&error),
    };

    let mut body = Vec::new();
    if let Err(error) = write_csv(&outcome.result, &mut body) {
        let payload = json!({ "error": error.to_string() });
        return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"grades.csv\"",
            ),
        ],
        body,
    )
        .into_response()
}

pub(crate) async fn project_handler(
    State(engine): State<Arc<GradeEngine>>,
    axum::Json(payload): axum::Json<ProjectionPayload>,
) -> Response {
    match engine.project(&payload.course, payload.target_point, payload.default_mode) {
        Ok(projection) => (StatusCode::OK, axum::Json(projection)).into_response(),
        Err(error) => grade_error_response(&error),
    }
}

pub(crate) fn grade_error_status(error: &GradeError) -> StatusCode {
    if error.is_configuration_defect() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

fn grade_error_response(error: &GradeError) -> Response {
    tracing::warn!(kind = error.kind(), %error, "grading request rejected");
    let payload = json!({
        "error": error.to_string(),
        "kind": error.kind(),
    });
    (grade_error_status(error), axum::Json(payload)).into_response()
}
