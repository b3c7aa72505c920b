//! Application setup and initialization
//!
//! This module contains the initialization logic extracted from main.rs for
//! better organization and testability.

pub mod routes;
pub mod server;

use crate::services::UpstreamClient;
use crate::state::AppState;
use aida_core::GatewayConfig;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Initialize the application: validate config, build state and router.
pub fn initialize_app(config: GatewayConfig) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    let upstream = UpstreamClient::new(
        &config.upstream_base_url,
        config.upstream_timeout_seconds,
    )
    .context("Failed to create upstream client")?;

    let is_production = config.is_production();
    let state = Arc::new(AppState {
        config: config.clone(),
        upstream,
        is_production,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
