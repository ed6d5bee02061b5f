//! Type definitions for hibp_relay
//!
//! Contains the startup error type and the configuration models shared by the
//! server bootstrap, the token gate and the upstream adapter.

use std::time::Duration;
use thiserror::Error;

/// Application startup errors
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("HTTP client error: {0}")]
    HttpClient(String),
    #[error("Server binding error: {0}")]
    ServerBind(String),
}

impl From<config::ConfigError> for StartupError {
    fn from(error: config::ConfigError) -> Self {
        StartupError::Config(error.to_string())
    }
}

/// Complete app configuration
#[derive(Clone)]
pub struct AppConfig {
    pub secret_key: String,
    pub bind_address: String,
    pub hibp: HibpConfig,
}

// Custom Debug implementation to hide the signing secret
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("secret_key", &"<hidden>")
            .field("bind_address", &self.bind_address)
            .field("hibp", &self.hibp)
            .finish()
    }
}

/// Upstream breach-intelligence API configuration
#[derive(Debug, Clone)]
pub struct HibpConfig {
    /// URL template with `{identifier}` and `{truncate}` placeholders
    pub api_url: String,
    /// Account identifier queried by the health check
    pub test_email: String,
    /// Value sent as `user-agent` on every upstream call
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for HibpConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_HIBP_API_URL.to_string(),
            test_email: DEFAULT_HIBP_TEST_EMAIL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

pub const DEFAULT_HIBP_API_URL: &str =
    "https://haveibeenpwned.com/api/v3/breachedaccount/{identifier}?truncateResponse={truncate}";
pub const DEFAULT_HIBP_TEST_EMAIL: &str = "test@example.com";
pub const DEFAULT_USER_AGENT: &str =
    "Threat Response Integrations <tr-integrations-support@cisco.com>";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
