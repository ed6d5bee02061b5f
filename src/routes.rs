//! Route registration
//!
//! `POST /health` relays a credential check to the breach-intelligence API.
//! `POST /version` reports the running relay version and needs no token.

use crate::health::health_check;
use crate::utils::response_handler::ResponseHandler;
use crate::VERSION;
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub version: String,
}

/// Version endpoint
pub async fn version() -> HttpResponse {
    ResponseHandler::success(VersionInfo {
        version: VERSION.to_string(),
    })
}

/// Configure all relay routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::post().to(health_check))
        .route("/version", web::post().to(version));
}
