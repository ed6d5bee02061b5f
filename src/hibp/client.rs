//! Upstream client adapter
//!
//! Builds the health-check request for the breach-intelligence API and issues
//! it exactly once. No retries happen here; rate limiting is reported back to
//! the caller by the error handler instead.

use crate::types::HibpConfig;
use crate::utils::error_handler::UpstreamErrorHandler;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Header carrying the caller's upstream credential
pub const API_KEY_HEADER: &str = "hibp-api-key";

const TRUNCATE_FLAG: &str = "true";

/// Largest upstream body read when looking for a `message`
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Unreserved characters are the only ones left as-is in the identifier
const IDENTIFIER_ENCODE_SET: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Transport-level failures talking to the upstream API
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream request timed out")]
    Timeout,

    #[error("Upstream connection failed: {0}")]
    Connect(String),

    #[error("Invalid upstream header value for {0}")]
    InvalidHeader(&'static str),

    #[error("Upstream request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            UpstreamError::Timeout
        } else if error.is_connect() {
            UpstreamError::Connect(error.to_string())
        } else {
            UpstreamError::Request(error.to_string())
        }
    }
}

/// A fully built upstream call
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub url: String,
    pub user_agent: String,
    pub api_key: String,
}

// Custom Debug implementation to hide the upstream credential
impl std::fmt::Debug for UpstreamRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamRequest")
            .field("url", &self.url)
            .field("user_agent", &self.user_agent)
            .field("api_key", &"<hidden>")
            .finish()
    }
}

impl UpstreamRequest {
    /// Health-check request for the configured test identifier
    pub fn health_check(config: &HibpConfig, api_key: &str) -> Self {
        Self {
            url: fill_template(&config.api_url, &config.test_email),
            user_agent: config.user_agent.clone(),
            api_key: api_key.to_string(),
        }
    }

    /// Headers in the exact form sent upstream
    pub fn headers(&self) -> Result<HeaderMap, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|_| UpstreamError::InvalidHeader("user-agent"))?,
        );

        let mut api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| UpstreamError::InvalidHeader(API_KEY_HEADER))?;
        api_key.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        Ok(headers)
    }
}

/// Substitute the percent-encoded identifier and the truncate flag
pub fn fill_template(template: &str, identifier: &str) -> String {
    let encoded = utf8_percent_encode(identifier, IDENTIFIER_ENCODE_SET).to_string();
    template.replace("{identifier}", &encoded).replace("{truncate}", TRUNCATE_FLAG)
}

/// Raw upstream answer, treated as untrusted
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl UpstreamResponse {
    pub fn new(status: u16, raw_body: &[u8]) -> Self {
        Self {
            status,
            body: serde_json::from_slice(raw_body).ok(),
        }
    }

    pub fn status_only(status: u16) -> Self {
        Self {
            status,
            body: None,
        }
    }

    /// Non-empty string `message` field of the body, if any
    pub fn message(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
    }
}

/// Seam between the relay and the breach-intelligence API
#[async_trait]
pub trait BreachApi: Send + Sync {
    /// Issue the request once and return whatever the upstream answered
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}

/// `reqwest`-backed upstream client
#[derive(Debug, Clone)]
pub struct HibpClient {
    http: reqwest::Client,
}

impl HibpClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        // The api key header must never follow a redirect to another host
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
        })
    }
}

#[async_trait]
impl BreachApi for HibpClient {
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let headers = request.headers()?;

        let response = self.http.get(&request.url).headers(headers).send().await?;
        let status = response.status().as_u16();
        log::debug!("Upstream answered {}", status);

        if !UpstreamErrorHandler::reads_upstream_message(status) {
            return Ok(UpstreamResponse::status_only(status));
        }

        Ok(match read_capped_body(response).await {
            Some(body) => UpstreamResponse::new(status, &body),
            None => UpstreamResponse::status_only(status),
        })
    }
}

/// Body of at most [`MAX_BODY_BYTES`], `None` when too large or unreadable
async fn read_capped_body(mut response: reqwest::Response) -> Option<Vec<u8>> {
    let mut body = Vec::new();

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    log::warn!("Upstream body exceeds {} bytes, ignoring it", MAX_BODY_BYTES);
                    return None;
                }
                body.extend_from_slice(&chunk);
            },
            Ok(None) => return Some(body),
            Err(e) => {
                log::warn!("Failed to read upstream body: {}", e);
                return None;
            },
        }
    }
}
