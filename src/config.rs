//! Configuration management for hibp_relay
//!
//! Loads the relay configuration from environment variables (a `.env` file is
//! honoured by `main`) with defaults for everything except the signing secret.

use crate::types::{AppConfig, HibpConfig, StartupError, DEFAULT_BIND_ADDRESS};
use config::{Config, Environment};
use serde::Deserialize;
use std::time::Duration;

/// Flat view of the environment, one field per variable
#[derive(Debug, Deserialize)]
struct RawSettings {
    secret_key: Option<String>,
    hibp_api_url: String,
    hibp_test_email: String,
    ctr_user_agent: String,
    hibp_timeout_seconds: u64,
    bind_address: String,
}

/// Load complete app configuration
pub fn load_config() -> Result<AppConfig, StartupError> {
    load_config_from(Environment::default())
}

fn load_config_from(environment: Environment) -> Result<AppConfig, StartupError> {
    let defaults = HibpConfig::default();
    let raw: RawSettings = Config::builder()
        .set_default("hibp_api_url", defaults.api_url)?
        .set_default("hibp_test_email", defaults.test_email)?
        .set_default("ctr_user_agent", defaults.user_agent)?
        .set_default("hibp_timeout_seconds", defaults.timeout.as_secs() as i64)?
        .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
        .add_source(environment)
        .build()?
        .try_deserialize()?;

    let config = AppConfig {
        secret_key: load_secret_key(raw.secret_key)?,
        bind_address: raw.bind_address,
        hibp: HibpConfig {
            api_url: raw.hibp_api_url,
            test_email: raw.hibp_test_email,
            user_agent: raw.ctr_user_agent,
            timeout: Duration::from_secs(raw.hibp_timeout_seconds),
        },
    };

    validate_config(&config)?;
    Ok(config)
}

/// Load the token signing secret (required)
fn load_secret_key(secret_key: Option<String>) -> Result<String, StartupError> {
    secret_key
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| StartupError::Config("SECRET_KEY environment variable is required".into()))
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), StartupError> {
    // The identifier is the only part of the URL that varies per call
    if !config.hibp.api_url.contains("{identifier}") {
        return Err(StartupError::Config(
            "HIBP_API_URL must contain an {identifier} placeholder".to_string(),
        ));
    }

    if config.hibp.test_email.trim().is_empty() {
        return Err(StartupError::Config("HIBP_TEST_EMAIL can't be empty".to_string()));
    }

    if config.hibp.user_agent.trim().is_empty() {
        return Err(StartupError::Config("CTR_USER_AGENT can't be empty".to_string()));
    }

    if config.hibp.timeout.is_zero() {
        return Err(StartupError::Config(
            "HIBP_TIMEOUT_SECONDS must be greater than zero".to_string(),
        ));
    }

    if config.bind_address.is_empty() {
        return Err(StartupError::Config("BIND_ADDRESS can't be empty".to_string()));
    }

    Ok(())
}
