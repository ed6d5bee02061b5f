//! HIBP Relay Service
//!
//! A relay between a trusted client platform and the Have I Been Pwned API,
//! built with Actix-web. Callers authenticate with a signed JWT carrying their
//! HIBP API key; every answer uses the `{"data": ...}` / `{"errors": [...]}`
//! envelope with HTTP 200.

pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod hibp;
pub mod routes;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use error::{CanonicalError, ErrorCode, RelayError};
pub use health::RelayState;
pub use routes::configure_routes;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "hibp-relay";
