//! Shared helpers for integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

use vidither::models::AppConfig;
use vidither::server::{build_router, create_app_state};

/// A buffered response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }
}

/// Test application with a router backed by temporary directories.
pub struct TestApp {
    router: axum::Router,
    pub output_dir: PathBuf,
    // Held so the temporary directories outlive the test
    _tmp: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("Failed to create temp dir");
        let output_dir = tmp.path().join("output");
        std::fs::create_dir_all(&output_dir).expect("Failed to create output dir");

        let config = Arc::new(AppConfig {
            output_dir: output_dir.clone(),
            work_dir: tmp.path().join("work"),
            ..Default::default()
        });
        let state = create_app_state(config);
        let router = build_router(state);

        Self {
            router,
            output_dir,
            _tmp: tmp,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
    }

    pub async fn post_multipart(&self, path: &str, form: &MultipartForm) -> TestResponse {
        self.request(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", form.boundary),
                )
                .body(Body::from(form.encode()))
                .expect("Failed to build request"),
        )
        .await
    }

    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Hand-built multipart/form-data request body.
pub struct MultipartForm {
    pub boundary: String,
    parts: Vec<Vec<u8>>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "vidither-test-boundary".to_string(),
            parts: Vec::new(),
        }
    }

    /// Add a plain text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        let mut part = Vec::new();
        part.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        part.extend_from_slice(value.as_bytes());
        self.parts.push(part);
        self
    }

    /// Add a file field.
    pub fn file(mut self, name: &str, file_name: &str, content: &[u8]) -> Self {
        let mut part = Vec::new();
        part.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        part.extend_from_slice(content);
        self.parts.push(part);
        self
    }

    fn encode(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for part in &self.parts {
            body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            body.extend_from_slice(part);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        body
    }
}
