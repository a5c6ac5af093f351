//! Error taxonomy for credential issuance and platform calls.
//!
//! The core raises these; only the `api` module maps them to HTTP statuses.

use thiserror::Error;

/// Upstream bodies longer than this are cut before landing in an error message.
const MAX_UPSTREAM_BODY: usize = 512;

/// Notify bridge errors.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A required secret, key or tenant id is not configured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote platform answered with a failure or an unusable body.
    #[error("{}", upstream_message(*status, body))]
    Upstream {
        /// HTTP status, absent for transport failures
        status: Option<u16>,
        /// Response body or transport error text
        body: String,
    },

    /// Expired, malformed, tampered or wrong-audience credential.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Request input rejected before reaching the platform.
    #[error("{0}")]
    Validation(String),

    /// Token encoding failed.
    #[error("Signing error: {0}")]
    Signing(String),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

fn upstream_message(status: Option<u16>, body: &str) -> String {
    match status {
        Some(status) => format!("Upstream error (status {status}): {body}"),
        None => format!("Upstream error: {body}"),
    }
}

impl BridgeError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an upstream error, truncating oversized bodies.
    #[must_use]
    pub fn upstream(status: Option<u16>, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.len() > MAX_UPSTREAM_BODY {
            let mut cut = MAX_UPSTREAM_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
            body.push_str("...");
        }
        Self::Upstream { status, body }
    }

    /// Create an invalid credential error.
    #[must_use]
    pub fn invalid_credential(reason: impl Into<String>) -> Self {
        Self::InvalidCredential(reason.into())
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => CONFIGURATION_ERROR,
            Self::Upstream { .. } => UPSTREAM_ERROR,
            Self::InvalidCredential(_) => INVALID_CREDENTIAL,
            Self::Validation(_) => VALIDATION_ERROR,
            Self::Signing(_) => SIGNING_ERROR,
        }
    }

    /// Whether the caller, rather than this service or the platform, is at fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidCredential(_) | Self::Validation(_))
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        Self::upstream(err.status().map(|s| s.as_u16()), err.to_string())
    }
}

// Error codes for HTTP error envelopes
/// Missing secret, API key or tenant.
pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
/// Remote platform failure.
pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
/// Credential rejected.
pub const INVALID_CREDENTIAL: &str = "INVALID_CREDENTIAL";
/// Bad request input.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Token encoding failure.
pub const SIGNING_ERROR: &str = "SIGNING_ERROR";
