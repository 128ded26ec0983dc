#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use savor_core::storage::LocalBlobStore;
use savor_db::MemoryStore;
use tempfile::TempDir;
use tower::ServiceExt;

use savor_api::config::ServerConfig;
use savor_api::router::build_app_router;
use savor_api::state::AppState;

const BOUNDARY: &str = "savor-test-boundary";

/// A router plus the temporary upload directory backing it.
///
/// Keep the whole struct alive for the duration of a test; dropping it
/// removes the upload directory.
pub struct TestApp {
    pub app: Router,
    pub uploads: TempDir,
}

impl TestApp {
    /// A fresh handle to the router for one request.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Number of files currently stored in the upload directory.
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.uploads.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        upload_url_prefix: "/uploads".to_string(),
        max_upload_bytes: 5 * 1024 * 1024,
        database_url: None,
    }
}

/// Build the full application router over an in-memory store and a
/// temporary upload directory.
///
/// Uses the same [`build_app_router`] as `main.rs` so integration tests
/// exercise the production middleware stack.
pub async fn build_test_app() -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let config = test_config(uploads.path());
    build_test_app_with(config, uploads).await
}

/// Like [`build_test_app`], but with a caller-supplied configuration. The
/// `uploads` directory is only kept alive; photos go to `config.upload_dir`.
pub async fn build_test_app_with(config: ServerConfig, uploads: TempDir) -> TestApp {
    let state = AppState::initialize(
        Arc::new(MemoryStore::new()),
        Arc::new(LocalBlobStore::new(&config.upload_dir, &config.upload_url_prefix)),
        config.clone(),
    )
    .await
    .unwrap();

    TestApp {
        app: build_app_router(state, &config),
        uploads,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart(app: Router, uri: &str, form: MultipartForm) -> Response<Body> {
    multipart_request(app, Method::POST, uri, form).await
}

pub async fn put_multipart(app: Router, uri: &str, form: MultipartForm) -> Response<Body> {
    multipart_request(app, Method::PUT, uri, form).await
}

async fn multipart_request(
    app: Router,
    method: Method,
    uri: &str,
    form: MultipartForm,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(form.finish()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}
