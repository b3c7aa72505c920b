//! AIDA Gateway API Library
//!
//! This crate provides the HTTP handlers, upstream client, and application
//! setup for the gateway. The binary in `main.rs` wires them together.

// Module declarations
mod handlers;
mod utils;

// Public modules
pub mod error;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::ErrorResponse;
pub use services::{UpstreamClient, UpstreamResponse};
