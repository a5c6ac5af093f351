//! Notify bridge library.
//!
//! Issues scoped, time-limited credentials for a notification platform's
//! embeddable widgets, verifies locally signed service credentials, and
//! forwards profile, message, template and brand operations to the platform.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod credential;
pub mod error;
pub mod metrics;
pub mod platform;
pub mod scope;

// Re-exports for convenience
pub use config::Config;
pub use error::{BridgeError, BridgeResult};
