//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, post_multipart, send, MultipartForm};

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let t = common::build_test_app().await;
    let response = get(t.router(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["store_healthy"], true);
    assert_eq!(json["uploads_ready"], true);
}

// ---------------------------------------------------------------------------
// Test: an unusable upload directory degrades health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unusable_upload_dir_reports_degraded() {
    let uploads = tempfile::tempdir().unwrap();
    let blocker = uploads.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let config = common::test_config(&blocker.join("photos"));

    let t = common::build_test_app_with(config, uploads).await;
    let response = get(t.router(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["store_healthy"], true);
    assert_eq!(json["uploads_ready"], false);
}

// ---------------------------------------------------------------------------
// Test: bodies above the upload limit are rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = common::test_config(uploads.path());
    config.max_upload_bytes = 1024;

    let t = common::build_test_app_with(config, uploads).await;
    let form = MultipartForm::new()
        .text("name", "Aurora")
        .file("image_1", "front.jpg", &[0u8; 4096]);
    let response = post_multipart(t.router(), "/api/v1/restaurants", form).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(t.stored_files(), 0);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let t = common::build_test_app().await;
    let response = get(t.router(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let t = common::build_test_app().await;
    let response = get(t.router(), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");

    // The value should be a valid UUID (36 chars with hyphens).
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS preflight from the configured origin is allowed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let t = common::build_test_app().await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/restaurants")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = send(t.router(), request).await;

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap()),
        Some("http://localhost:5173")
    );
}
