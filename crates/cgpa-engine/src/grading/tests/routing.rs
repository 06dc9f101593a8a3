use super::common::*;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::grading::grading_router;

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn term_payload() -> Value {
    json!({
        "courses": [
            {
                "name": "Algorithms",
                "credits": 4,
                "components": [
                    { "id": "EC1", "weight": 30, "score": 90 },
                    { "id": "EC2", "weight": 30, "score": 85 },
                    { "id": "EC3", "weight": 40, "score": 95 }
                ]
            },
            {
                "name": "Operating Systems",
                "credits": 5,
                "components": [
                    { "id": "EC1", "weight": 30, "score": 80 },
                    { "id": "EC2", "weight": 40, "score": 80 },
                    { "id": "EC3", "weight": 30, "pending": true }
                ]
            }
        ],
        "prior_terms": [{ "label": "Term 1", "sgpa": 8.0 }],
        "projection": { "course": "Operating Systems", "target_point": 8 }
    })
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json body")
}

#[tokio::test]
async fn evaluate_endpoint_returns_results_and_projection() {
    let app = grading_router(Arc::new(engine()));

    let response = app
        .oneshot(post_json("/api/v1/grades/evaluate", term_payload()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["courses"][0]["grade"], "A");
    assert_eq!(body["courses"][1]["point"], 6);
    assert_eq!(body["sgpa"], 8.0);
    assert_eq!(body["cgpa"], 8.0);
    assert_eq!(body["overall_passed"], true);
    assert_eq!(body["projection"]["unreachable"], false);
}

#[tokio::test]
async fn evaluate_endpoint_rejects_bad_weights() {
    let app = grading_router(Arc::new(engine()));
    let mut payload = term_payload();
    payload["courses"][0]["components"][2]["weight"] = json!(35);

    let response = app
        .oneshot(post_json("/api/v1/grades/evaluate", payload))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body["kind"], "invalid_weight");
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("Algorithms"));
}

#[tokio::test]
async fn missing_cutoffs_are_reported_as_bad_requests() {
    let app = grading_router(Arc::new(engine()));
    let mut payload = term_payload();
    payload["default_mode"] = json!("relative");

    let response = app
        .oneshot(post_json("/api/v1/grades/evaluate", payload))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["kind"], "missing_cutoff");
}

#[tokio::test]
async fn csv_endpoint_streams_a_download() {
    let app = grading_router(Arc::new(engine()));

    let response = app
        .oneshot(post_json("/api/v1/grades/evaluate.csv", term_payload()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let text = String::from_utf8(body.to_vec()).expect("utf8 csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "name,credits,weighted_percent,grade,point,passed");
    assert_eq!(lines[1], "Algorithms,4.0,90.50,A,10,true");
    assert_eq!(lines[2], "Operating Systems,5.0,56.00,C,6,true");
    assert_eq!(lines[4], "8.00,8.00,true");
}

#[tokio::test]
async fn project_endpoint_flags_unreachable_targets() {
    let app = grading_router(Arc::new(engine()));
    let payload = json!({
        "course": {
            "name": "Operating Systems",
            "components": [
                { "id": "EC1", "weight": 30, "marks": 24 },
                { "id": "EC2", "weight": 40, "marks": 32 },
                { "id": "EC3", "weight": 30, "pending": true }
            ]
        },
        "target_point": 10
    });

    let response = app
        .oneshot(post_json("/api/v1/grades/project", payload))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["unreachable"], true);
    assert_eq!(body["best_attainable_grade"], "A-");
    let required = body["required_percent"].as_f64().expect("numeric");
    assert!((required - 113.33).abs() < 0.01);
}
