// Integration tests for the HTTP transport

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use caf_gen::server::router;
use caf_gen::{CafGenerator, ExpansionLimits, ReferenceIndex, ReferenceRecord, SnapshotSource};
use serde_json::Value;
use tower::ServiceExt;

fn create_app() -> axum::Router {
    let index = ReferenceIndex::from_records(vec![
        ReferenceRecord::new("01", "2025", "99"),
        ReferenceRecord::new("01", "2025", "2599"),
    ]);
    router(CafGenerator::new(SnapshotSource::new(index)).with_limits(ExpansionLimits::default()))
}

async fn post_json(app: axum::Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/gerar")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_raw(app: axum::Router, body: &'static str) -> (StatusCode, String, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/gerar")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .to_string();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_generate_ok() {
    let (status, body) = post_json(create_app(), r#"{"caf": " zz012025** "}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["combos"], serde_json::json!(["ZZ01202599"]));
}

#[tokio::test]
async fn test_generate_empty_result() {
    let (status, body) = post_json(create_app(), r#"{"caf": "ZZ01202511"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["combos"], serde_json::json!([]));
}

#[tokio::test]
async fn test_missing_caf() {
    let (status, body) = post_json(create_app(), "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["erro"], "Informe um CAF.");
}

#[tokio::test]
async fn test_empty_body_without_content_type() {
    let (status, content_type, body) = post_raw(create_app(), "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "application/json");
    assert_eq!(body["erro"], "Informe um CAF.");
}

#[tokio::test]
async fn test_body_without_content_type_is_accepted() {
    let (status, _, body) = post_raw(create_app(), r#"{"caf": "ZZ012025**"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["combos"], serde_json::json!(["ZZ01202599"]));
}

#[tokio::test]
async fn test_malformed_json() {
    let (status, content_type, body) = post_raw(create_app(), "{not json").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type, "application/json");
    assert!(body["erro"].as_str().unwrap().starts_with("Erro interno:"));
}

#[tokio::test]
async fn test_caf_of_wrong_type() {
    let (status, content_type, body) = post_raw(create_app(), r#"{"caf": 123}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type, "application/json");
    assert!(body["erro"].as_str().unwrap().starts_with("Erro interno:"));
}

#[tokio::test]
async fn test_invalid_format() {
    let (status, body) = post_json(create_app(), r#"{"caf": "ZZ01-2025"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["erro"].as_str().unwrap().starts_with("Use apenas"));
}

#[tokio::test]
async fn test_unknown_period() {
    let (status, body) = post_json(create_app(), r#"{"caf": "ZZ022025**"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["erro"], "Nenhum código encontrado para 02/2025.");
}

#[tokio::test]
async fn test_limit_exceeded() {
    let (status, body) = post_json(create_app(), r#"{"caf": "ZZ012025****"}"#).await;
    assert_eq!(status, StatusCode::OK, "4 wildcards fit the default limits: {}", body);

    let (status, body) = post_json(create_app(), r#"{"caf": "ZZ012025******"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["erro"], "Excesso de curingas (6). Máximo: 5");
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/gerar")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = create_app().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = create_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
