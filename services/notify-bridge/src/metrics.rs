//! Prometheus metrics for the notify bridge.

use once_cell::sync::Lazy;
use prometheus::{CounterVec, Encoder, TextEncoder, register_counter_vec};

/// Credentials issued counter.
pub static CREDENTIALS_ISSUED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "notify_bridge_credentials_issued_total",
        "Total number of credentials issued",
        &["strategy", "purpose"]
    )
    .expect("Failed to register credentials_issued metric")
});

/// Credential verifications counter.
pub static CREDENTIAL_VERIFICATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "notify_bridge_credential_verifications_total",
        "Total number of credential verifications",
        &["outcome"]
    )
    .expect("Failed to register credential_verifications metric")
});

/// Platform requests counter.
pub static PLATFORM_REQUESTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "notify_bridge_platform_requests_total",
        "Total number of requests sent to the notification platform",
        &["operation", "outcome"]
    )
    .expect("Failed to register platform_requests metric")
});

/// Record a credential issuance.
pub fn record_credential_issued(strategy: &str, purpose: &str) {
    CREDENTIALS_ISSUED
        .with_label_values(&[strategy, purpose])
        .inc();
}

/// Record a verification outcome (`valid` or a rejection reason).
pub fn record_verification(outcome: &str) {
    CREDENTIAL_VERIFICATIONS.with_label_values(&[outcome]).inc();
}

/// Record a platform request outcome.
pub fn record_platform_request(operation: &str, outcome: &str) {
    PLATFORM_REQUESTS
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Render the default registry in the text exposition format.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn render() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
