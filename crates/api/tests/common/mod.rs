//! Shared helpers for the HTTP-level integration tests.
//!
//! Requests are sent straight into the router via `tower::ServiceExt`, no
//! TCP listener involved. The app under test is built with the production
//! `build_app_router` so the full middleware stack is exercised.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use tasca_api::config::ServerConfig;
use tasca_api::images::ImageStore;
use tasca_api::router::build_app_router;
use tasca_api::state::AppState;
use tasca_trello::TrelloClient;

/// Build a test `ServerConfig` with safe defaults and a unique upload
/// directory under the system temp dir.
pub fn test_config() -> ServerConfig {
    let upload_dir = std::env::temp_dir().join(format!("tasca-test-{}", uuid::Uuid::new_v4()));
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir,
        max_upload_bytes: 5 * 1024 * 1024,
    }
}

/// Build the production router over the given pool, with an unconfigured
/// Trello client (mirroring becomes a no-op).
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_uploads(pool).0
}

/// Like [`build_test_app`] but also returns the upload directory so tests
/// can inspect stored image files.
pub fn build_test_app_with_uploads(pool: PgPool) -> (Router, PathBuf) {
    let (router, upload_dir, _) = build_app(pool, TrelloClient::new(None));
    (router, upload_dir)
}

/// Build the app with a caller-supplied Trello client, for tests driving
/// the configured mirror against a stub server.
pub fn build_test_app_with_trello(pool: PgPool, trello: TrelloClient) -> Router {
    build_app(pool, trello).0
}

fn build_app(pool: PgPool, trello: TrelloClient) -> (Router, PathBuf, ServerConfig) {
    let config = test_config();
    let upload_dir = config.upload_dir.clone();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images: Arc::new(ImageStore::new(upload_dir.clone(), config.max_upload_bytes)),
        trello: Arc::new(trello),
    };

    (build_app_router(state, &config), upload_dir, config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PATCH, uri, body).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
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
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "Response body is not valid JSON ({e}): {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

/// Minimal multipart/form-data body builder for the todo endpoints.
pub struct MultipartForm {
    boundary: String,
    buf: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("----tasca-test-{}", uuid::Uuid::new_v4().simple()),
            buf: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.buf.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, filename: &str, mime: &str, bytes: &[u8]) -> Self {
        self.buf
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.buf.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    /// Finish the form, returning the `Content-Type` header value and body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.buf,
        )
    }
}

/// Send a multipart request built with [`MultipartForm`].
pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    form: MultipartForm,
) -> Response<Body> {
    let (content_type, body) = form.finish();
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Create a category through the API and return its ID.
pub async fn create_category(app: Router, name: &str) -> i64 {
    let response = post_json(
        app,
        "/api/categories",
        serde_json::json!({"name": name}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["id"].as_i64().unwrap()
}

/// Create a todo through the API (multipart, no image) and return the body.
pub async fn create_todo(app: Router, title: &str, category_id: i64) -> serde_json::Value {
    let form = MultipartForm::new()
        .text("title", title)
        .text("category_id", &category_id.to_string());
    let response = send_multipart(app, Method::POST, "/api/todos", form).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Encode a solid-color PNG of the given dimensions for upload tests.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([120, 40, 200]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
