//! Configuration module
//!
//! Gateway configuration loaded from the environment. Call `dotenvy::dotenv()`
//! before `GatewayConfig::from_env()` so a local `.env` file is picked up.

use std::env;
use std::path::PathBuf;

// Defaults
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8000";
const DEFAULT_MAX_UPLOAD_SIZE_BYTES: usize = 50 * 1024 * 1024;
const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 60;

/// Gateway configuration.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Listen port (`PORT`).
    pub server_port: u16,
    /// Base URL of the analysis service (`UPSTREAM_URL`, legacy `PYTHON_SERVICE_URL`).
    pub upstream_base_url: String,
    /// Allowed CORS origins (`CORS_ORIGINS`, comma-separated; `*` allows any).
    pub cors_origins: Vec<String>,
    /// Inbound request body limit (`MAX_UPLOAD_SIZE_BYTES`).
    pub max_upload_size_bytes: usize,
    /// Directory for spooled upload files (`UPLOAD_SPOOL_DIR`, system temp dir when unset).
    pub upload_spool_dir: Option<PathBuf>,
    /// Outbound HTTP client timeout (`UPSTREAM_TIMEOUT_SECONDS`).
    pub upstream_timeout_seconds: u64,
    /// Deployment environment (`ENVIRONMENT`): development / production.
    pub environment: String,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let server_port = parse_env_or("PORT", DEFAULT_PORT);

        let upstream_base_url = env::var("UPSTREAM_URL")
            .or_else(|_| env::var("PYTHON_SERVICE_URL"))
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_bytes =
            parse_env_or("MAX_UPLOAD_SIZE_BYTES", DEFAULT_MAX_UPLOAD_SIZE_BYTES);

        let upload_spool_dir = env::var("UPLOAD_SPOOL_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let upstream_timeout_seconds =
            parse_env_or("UPSTREAM_TIMEOUT_SECONDS", DEFAULT_UPSTREAM_TIMEOUT_SECONDS);

        let environment =
            env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            server_port,
            upstream_base_url,
            cors_origins,
            max_upload_size_bytes,
            upload_spool_dir,
            upstream_timeout_seconds,
            environment,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Fail fast on misconfiguration.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let url = self.upstream_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!(
                "UPSTREAM_URL must start with http:// or https:// (got '{}')",
                self.upstream_base_url
            );
        }

        if self.max_upload_size_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_SIZE_BYTES must be greater than zero");
        }

        if self.upstream_timeout_seconds == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECONDS must be greater than zero");
        }

        Ok(())
    }
}

/// Parse an env var, falling back to the default when unset or unparseable.
fn parse_env_or<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    var = name,
                    value = %raw,
                    default = %default,
                    "Invalid value in environment, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}
