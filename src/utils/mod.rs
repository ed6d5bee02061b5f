//! Response shaping helpers

pub mod error_handler;
pub mod response_handler;
