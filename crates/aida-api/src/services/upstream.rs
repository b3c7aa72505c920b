//! HTTP client for the upstream analysis service.
//!
//! The upstream is a black box: requests carry the uploaded file as multipart
//! form data, and whatever JSON comes back is relayed to the caller without
//! being parsed. Connect failures on submission are classified separately so
//! the gateway can answer 503 instead of a generic 500.

use aida_core::AppError;
use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::{Client, Url};
use std::path::Path;
use std::time::Duration;

/// Raw upstream response: status, declared content type, body bytes.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Client for the analysis service with a fixed base URL.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid upstream URL: {}", base_url))?;

        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("AidaGateway/{}", version);

        // Analysis can take time, so the timeout is configurable and generous.
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(&user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Base URL joined with path segments. Segments are pushed individually so
    /// opaque values like job identifiers are percent-encoded, never spliced.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Upstream URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Submit a spooled upload for analysis via `POST {base}/analyze`.
    ///
    /// Returns the upstream body untouched on 2xx. A connect failure maps to
    /// `UpstreamUnavailable`; any other transport error or a non-2xx upstream
    /// status maps to `UpstreamFailed`.
    pub async fn analyze(
        &self,
        file_path: &Path,
        filename: &str,
        content_type: &str,
        analysis_type: &str,
    ) -> Result<UpstreamResponse, AppError> {
        let file_contents = tokio::fs::read(file_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read spooled upload: {}", e)))?;

        let part = reqwest::multipart::Part::bytes(file_contents)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| {
                AppError::InvalidInput(format!("Invalid content type '{}': {}", content_type, e))
            })?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("analysis_type", analysis_type.to_string());

        let response = self
            .client
            .post(self.endpoint(&["analyze"])?)
            .multipart(form)
            .send()
            .await
            .map_err(classify_send_error)?;

        let relayed = read_response(response).await?;
        if !relayed.is_success() {
            return Err(AppError::UpstreamFailed(format!(
                "upstream returned status {}",
                relayed.status
            )));
        }
        Ok(relayed)
    }

    /// Query job status via `GET {base}/status/{job_id}`.
    ///
    /// Upstream HTTP responses are returned whatever their status, so unknown
    /// job identifiers surface exactly what upstream says about them.
    /// Transport failures of any kind collapse to `UpstreamFailed`.
    pub async fn status(&self, job_id: &str) -> Result<UpstreamResponse, AppError> {
        let response = self
            .client
            .get(self.endpoint(&["status", job_id])?)
            .send()
            .await
            .map_err(|e| AppError::UpstreamFailed(format!("Status query failed: {}", e)))?;

        read_response(response).await
    }
}

/// Classify a submission transport error: connect failures are the
/// "service unavailable" case callers branch on.
fn classify_send_error(err: reqwest::Error) -> AppError {
    if err.is_connect() {
        AppError::UpstreamUnavailable(err.to_string())
    } else {
        AppError::UpstreamFailed(err.to_string())
    }
}

async fn read_response(response: reqwest::Response) -> Result<UpstreamResponse, AppError> {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::UpstreamFailed(format!("Failed to read upstream body: {}", e)))?;

    Ok(UpstreamResponse {
        status,
        content_type,
        body,
    })
}
