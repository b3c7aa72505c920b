//! Test helpers: build gateway state and router against a fake upstream.
//!
//! Run from workspace root: `cargo test -p aida-api --test gateway_test`.
//! The upstream is a `mockito` server (or a closed port for the
//! unreachable-upstream cases); the gateway router runs in-process via
//! `axum_test::TestServer`.

use aida_api::services::UpstreamClient;
use aida_api::setup::routes::setup_routes;
use aida_api::state::AppState;
use aida_core::GatewayConfig;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: in-process server plus the spool directory it writes to.
pub struct TestApp {
    pub server: TestServer,
    spool_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of files currently spooled. Zero after any finished request.
    pub fn spooled_file_count(&self) -> usize {
        std::fs::read_dir(self.spool_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Setup a gateway wired to the given upstream base URL, with an isolated
/// spool directory.
pub fn setup_test_app(upstream_url: &str) -> TestApp {
    setup_app_with(upstream_url, |_| {})
}

/// Same as `setup_test_app`, but lets the test adjust the config first
/// (e.g. shrink the body limit or switch to production mode).
pub fn setup_app_with(
    upstream_url: &str,
    customize: impl FnOnce(&mut GatewayConfig),
) -> TestApp {
    let spool_dir = TempDir::new().expect("create spool dir");

    let mut config = GatewayConfig {
        server_port: 0,
        upstream_base_url: upstream_url.to_string(),
        cors_origins: vec!["*".to_string()],
        max_upload_size_bytes: 10 * 1024 * 1024,
        upload_spool_dir: Some(spool_dir.path().to_path_buf()),
        upstream_timeout_seconds: 5,
        environment: "test".to_string(),
    };
    customize(&mut config);

    let upstream = UpstreamClient::new(&config.upstream_base_url, config.upstream_timeout_seconds)
        .expect("create upstream client");
    let state = Arc::new(AppState {
        config: config.clone(),
        upstream,
        is_production: config.is_production(),
    });
    let router = setup_routes(&config, state).expect("build router");

    TestApp {
        server: TestServer::new(router).expect("start test server"),
        spool_dir,
    }
}

/// Multipart form with a file part and an optional analysis_type field.
pub fn upload_form(filename: &str, content: &[u8], analysis_type: Option<&str>) -> MultipartForm {
    let mut form = MultipartForm::new().add_part(
        "file",
        Part::bytes(content.to_vec())
            .file_name(filename.to_string())
            .mime_type("text/csv"),
    );
    if let Some(tag) = analysis_type {
        form = form.add_text("analysis_type", tag);
    }
    form
}
