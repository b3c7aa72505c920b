//! Application state shared across handlers.
//!
//! The gateway holds no mutable state between requests; everything here is
//! immutable after startup and shared behind an `Arc`.

use crate::services::UpstreamClient;
use aida_core::GatewayConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub upstream: UpstreamClient,
    pub is_production: bool,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
