//! AIDA Gateway Core Library
//!
//! This crate provides the configuration and error types shared by the
//! gateway binary and its tests. It deliberately contains no HTTP types.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::GatewayConfig;
pub use error::{AppError, ErrorMetadata, LogLevel};
