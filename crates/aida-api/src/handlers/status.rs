//! Job status handler: read-only proxy to the upstream status endpoint.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
};
use std::sync::Arc;

/// Relay `GET /status/{job_id}` from upstream unmodified, whatever its
/// status. The job identifier is opaque; no caching, no retry.
pub async fn job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Response {
    match relay_status(&state, &job_id).await {
        Ok(response) => response,
        Err(err) => err.into_response_for(state.is_production),
    }
}

async fn relay_status(state: &AppState, job_id: &str) -> Result<Response, HttpAppError> {
    tracing::debug!(job_id = %job_id, "Relaying status query");

    let outcome = state.upstream.status(job_id).await?;

    super::relay(outcome)
}
