//! Verification of locally signed credentials.
//!
//! Only Strategy A credentials can be checked here. Remotely issued ones are
//! opaque and are verified by the platform when presented there.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, Validation, decode};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::config::{SigningAlgorithm, SigningConfig};
use crate::credential::claims::{AUDIENCE, LocalClaims};
use crate::error::{BridgeError, BridgeResult};
use crate::metrics;

/// Validates signature, audience and expiry of a locally signed credential.
pub struct CredentialVerifier {
    secret: Option<DecodingKey>,
    algorithm: Option<SigningAlgorithm>,
}

impl CredentialVerifier {
    /// Create a verifier from the signing configuration.
    #[must_use]
    pub fn new(config: &SigningConfig) -> Self {
        Self {
            secret: config
                .secret
                .as_ref()
                .map(|s| DecodingKey::from_secret(s.expose_secret().as_bytes())),
            algorithm: config.algorithm,
        }
    }

    /// Decode `token`, returning `None` for any invalid credential.
    ///
    /// Expired, malformed, tampered and wrong-audience tokens are all
    /// reported the same way.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<LocalClaims> {
        self.decode(token).ok()
    }

    /// Decode `token`, distinguishing misconfiguration from a bad credential.
    ///
    /// # Errors
    ///
    /// `Configuration` when the secret or algorithm is unset;
    /// `InvalidCredential` for any token that fails validation.
    pub fn decode(&self, token: &str) -> BridgeResult<LocalClaims> {
        let key = self
            .secret
            .as_ref()
            .ok_or_else(|| BridgeError::configuration("JWT_SECRET_KEY not configured"))?;
        let algorithm = self
            .algorithm
            .ok_or_else(|| BridgeError::configuration("JWT_ALGORITHM not configured"))?;

        let mut validation = Validation::new(algorithm.to_jwt());
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_audience(&[AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);

        match decode::<LocalClaims>(token, key, &validation) {
            Ok(data) => {
                metrics::record_verification("valid");
                Ok(data.claims)
            }
            Err(err) => {
                let reason = rejection_reason(err.kind());
                debug!(reason, "Rejected credential");
                metrics::record_verification(reason);
                Err(BridgeError::invalid_credential(reason))
            }
        }
    }
}

fn rejection_reason(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ExpiredSignature => "expired",
        ErrorKind::InvalidSignature => "signature_mismatch",
        ErrorKind::InvalidAudience => "audience_mismatch",
        ErrorKind::InvalidAlgorithm => "algorithm_mismatch",
        _ => "malformed",
    }
}
