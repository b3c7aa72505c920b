//! Gateway integration tests.
//!
//! Run with: `cargo test -p aida-api --test gateway_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::{setup_app_with, setup_test_app, upload_form};
use mockito::Matcher;
use serde_json::Value;

/// Base URL that refuses connections (nothing listens on port 1).
const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:1";

#[tokio::test]
async fn test_health() {
    let app = setup_test_app(UNREACHABLE_UPSTREAM);

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "gateway");
}

#[tokio::test]
async fn test_analyze_without_file_returns_400_and_no_upstream_call() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/analyze")
        .expect(0)
        .create_async()
        .await;

    let app = setup_test_app(&upstream.url());

    let form = MultipartForm::new().add_text("analysis_type", "quality");
    let response = app.client().post("/api/analyze").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(body["error"], "Invalid input: No file uploaded");
    // Outside production, non-sensitive errors carry details
    assert!(body.get("details").is_some());

    mock.assert_async().await;
    assert_eq!(app.spooled_file_count(), 0);
}

#[tokio::test]
async fn test_analyze_oversized_upload_returns_413() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/analyze")
        .expect(0)
        .create_async()
        .await;

    let app = setup_app_with(&upstream.url(), |config| {
        config.max_upload_size_bytes = 1024;
    });

    let oversized = vec![b'x'; 64 * 1024];
    let form = upload_form("big.csv", &oversized, Some("quality"));
    let response = app.client().post("/api/analyze").multipart(form).await;

    assert_eq!(response.status_code(), 413);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(body["suggested_action"], "Reduce the file size and retry");

    mock.assert_async().await;
    assert_eq!(app.spooled_file_count(), 0);
}

#[tokio::test]
async fn test_production_mode_hides_error_details() {
    let app = setup_app_with(UNREACHABLE_UPSTREAM, |config| {
        config.environment = "production".to_string();
    });

    let form = MultipartForm::new().add_text("analysis_type", "quality");
    let response = app.client().post("/api/analyze").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body.get("details").is_none());
    assert!(body.get("error_type").is_none());
}

#[tokio::test]
async fn test_analyze_rejects_multiple_file_fields() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/analyze")
        .expect(0)
        .create_async()
        .await;

    let app = setup_test_app(&upstream.url());

    let form = upload_form("first.csv", b"1\n", None).add_part(
        "file",
        axum_test::multipart::Part::bytes(b"2\n".to_vec())
            .file_name("second.csv")
            .mime_type("text/csv"),
    );
    let response = app.client().post("/api/analyze").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_analyze_relays_upstream_body_byte_for_byte() {
    let upstream_body = r#"{"job_id":"abc123"}"#;

    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/analyze")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("data.csv".to_string()),
            Matcher::Regex("quality".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(upstream_body)
        .expect(1)
        .create_async()
        .await;

    let app = setup_test_app(&upstream.url());

    let form = upload_form("data.csv", b"a,b\n1,2\n", Some("quality"));
    let response = app.client().post("/api/analyze").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), upstream_body);

    mock.assert_async().await;
    assert_eq!(app.spooled_file_count(), 0);
}

#[tokio::test]
async fn test_analyze_defaults_analysis_type_to_general() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/analyze")
        .match_body(Matcher::Regex("general".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"completed"}"#)
        .expect(1)
        .create_async()
        .await;

    let app = setup_test_app(&upstream.url());

    let form = upload_form("data.csv", b"a,b\n1,2\n", None);
    let response = app.client().post("/api/analyze").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_analyze_unreachable_upstream_returns_503() {
    let app = setup_test_app(UNREACHABLE_UPSTREAM);

    let form = upload_form("data.csv", b"a,b\n1,2\n", Some("quality"));
    let response = app.client().post("/api/analyze").multipart(form).await;

    assert_eq!(response.status_code(), 503);
    let body: Value = response.json();
    assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
    assert_eq!(body["error"], "AI Service Unavailable");
    assert_eq!(body["recoverable"], true);

    // Temp file removed even though forwarding failed
    assert_eq!(app.spooled_file_count(), 0);
}

#[tokio::test]
async fn test_analyze_upstream_error_returns_generic_500() {
    let mut upstream = mockito::Server::new_async().await;
    let _mock = upstream
        .mock("POST", "/analyze")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"agents exploded"}"#)
        .create_async()
        .await;

    let app = setup_test_app(&upstream.url());

    let form = upload_form("data.csv", b"a,b\n1,2\n", Some("quality"));
    let response = app.client().post("/api/analyze").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "UPSTREAM_FAILED");
    assert_eq!(body["error"], "Analysis failed");

    assert_eq!(app.spooled_file_count(), 0);
}

#[tokio::test]
async fn test_status_relays_upstream_response_verbatim() {
    let upstream_body = r#"{"job_id":"abc123","status":"running","progress":42}"#;

    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("GET", "/status/abc123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(upstream_body)
        .expect(1)
        .create_async()
        .await;

    let app = setup_test_app(&upstream.url());

    let response = app.client().get("/api/status/abc123").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), upstream_body);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_status_unknown_job_surfaces_upstream_404_unmodified() {
    let upstream_body = r#"{"detail":"Job not found"}"#;

    let mut upstream = mockito::Server::new_async().await;
    let _mock = upstream
        .mock("GET", "/status/no-such-job")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(upstream_body)
        .create_async()
        .await;

    let app = setup_test_app(&upstream.url());

    let response = app.client().get("/api/status/no-such-job").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.text(), upstream_body);
}

#[tokio::test]
async fn test_status_transport_failure_collapses_to_500() {
    let app = setup_test_app(UNREACHABLE_UPSTREAM);

    let response = app.client().get("/api/status/abc123").await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "UPSTREAM_FAILED");
}
