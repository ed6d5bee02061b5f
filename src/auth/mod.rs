//! Inbound token gate
//!
//! Verifies the platform-issued JWT and exposes the upstream API key it carries.

pub mod extractor;
pub mod jwt;

pub use extractor::HibpCredentials;
pub use jwt::{Claims, JwtService};
