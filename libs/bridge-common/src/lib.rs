//! Shared library for cross-cutting concerns in notify-bridge services.
//!
//! This crate provides centralized implementations for:
//! - Outbound HTTP client configuration and building
//! - Tracing subscriber initialization

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod http;
pub mod tracing_config;

pub use http::{HttpConfig, build_http_client};
pub use tracing_config::{LogFormat, TracingConfig, init_tracing};
