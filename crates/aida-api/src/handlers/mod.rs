//! Request handlers.

pub mod analyze;
pub mod health;
pub mod status;

use crate::error::HttpAppError;
use crate::services::UpstreamResponse;
use aida_core::AppError;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};

/// Build a response that relays an upstream reply unchanged: same status,
/// same body bytes. Upstream replies are JSON unless declared otherwise.
pub(crate) fn relay(upstream: UpstreamResponse) -> Result<Response, HttpAppError> {
    let status = StatusCode::from_u16(upstream.status).map_err(|_| {
        HttpAppError(AppError::UpstreamFailed(format!(
            "invalid upstream status {}",
            upstream.status
        )))
    })?;

    let content_type = upstream
        .content_type
        .unwrap_or_else(|| "application/json".to_string());

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(upstream.body))
        .map_err(|e| {
            HttpAppError(AppError::Internal(format!(
                "Failed to build relay response: {}",
                e
            )))
        })
}
