//! Breach-intelligence API integration

pub mod client;

pub use client::{BreachApi, HibpClient, UpstreamError, UpstreamRequest, UpstreamResponse};
