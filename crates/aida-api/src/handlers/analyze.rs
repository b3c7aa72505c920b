//! Upload-and-analyze handler: the relay at the heart of the gateway.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_upload;
use axum::{
    extract::{Multipart, State},
    response::Response,
};
use std::sync::Arc;

/// Accept one uploaded file, forward it to the analysis service, and relay
/// the upstream JSON verbatim.
///
/// 400 when no file field is present (no outbound call is made), 413 when the
/// upload blows the configured size limit, 503 when upstream refuses the
/// connection, 500 for every other failure. The spooled temp file is removed
/// on every exit path, including early returns via `?`.
pub async fn analyze(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    match relay_analysis(&state, multipart).await {
        Ok(response) => response,
        Err(err) => err.into_response_for(state.is_production),
    }
}

async fn relay_analysis(
    state: &AppState,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let upload = extract_upload(multipart, state.config.upload_spool_dir.as_deref()).await?;

    tracing::info!(
        filename = %upload.filename,
        content_type = %upload.content_type,
        analysis_type = %upload.analysis_type,
        size_bytes = upload.size,
        "Received file, forwarding to analysis service"
    );

    let outcome = state
        .upstream
        .analyze(
            upload.path(),
            &upload.filename,
            &upload.content_type,
            &upload.analysis_type,
        )
        .await?;

    super::relay(outcome)
}
