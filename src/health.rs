//! Health Check Handler
//!
//! `POST /health` proves that the caller's credential is accepted by the
//! breach-intelligence API. The pipeline is a single pass:
//!
//! 1. verify the bearer token (see [`HibpCredentials`])
//! 2. issue one upstream request for the configured test identifier
//! 3. classify the upstream status
//! 4. wrap the outcome in the response envelope
//!
//! Every outcome is returned with HTTP 200.

use crate::auth::HibpCredentials;
use crate::error::RelayError;
use crate::hibp::{BreachApi, UpstreamRequest};
use crate::types::HibpConfig;
use crate::utils::error_handler::UpstreamErrorHandler;
use crate::utils::response_handler::{HealthStatus, ResponseHandler};
use actix_web::{web, HttpResponse};
use std::sync::Arc;

/// Read-only state shared by all workers
#[derive(Clone)]
pub struct RelayState {
    pub hibp: HibpConfig,
    pub upstream: Arc<dyn BreachApi>,
}

impl RelayState {
    pub fn new(hibp: HibpConfig, upstream: Arc<dyn BreachApi>) -> Self {
        Self {
            hibp,
            upstream,
        }
    }
}

/// Health endpoint
pub async fn health_check(
    credentials: HibpCredentials,
    state: web::Data<RelayState>,
) -> Result<HttpResponse, RelayError> {
    let request = UpstreamRequest::health_check(&state.hibp, &credentials.api_key);

    let response = state.upstream.send(&request).await.map_err(|e| {
        log::error!("Health check upstream call failed: {}", e);
        RelayError::from(e)
    })?;

    UpstreamErrorHandler::classify(&response).map_err(|e| {
        log::warn!("Health check rejected upstream (status {}): {}", response.status, e.code().as_str());
        e
    })?;

    log::info!("Health check succeeded");
    Ok(ResponseHandler::success(HealthStatus::ok()))
}
