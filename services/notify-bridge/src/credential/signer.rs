//! Strategy A: local HMAC signing.

use jsonwebtoken::{EncodingKey, Header, encode};
use secrecy::ExposeSecret;
use std::time::Duration;

use crate::config::{SigningAlgorithm, SigningConfig};
use crate::credential::claims::LocalClaims;
use crate::error::{BridgeError, BridgeResult};
use crate::scope::ScopeSet;

/// Signs [`LocalClaims`] with the configured secret.
///
/// Construction never fails; a missing secret or algorithm surfaces as a
/// configuration error on the first signing attempt.
#[derive(Clone)]
pub struct LocalSigner {
    secret: Option<EncodingKey>,
    algorithm: Option<SigningAlgorithm>,
    expiration: Duration,
}

impl LocalSigner {
    /// Create a signer from the signing configuration.
    #[must_use]
    pub fn new(config: &SigningConfig) -> Self {
        Self {
            secret: config
                .secret
                .as_ref()
                .map(|s| EncodingKey::from_secret(s.expose_secret().as_bytes())),
            algorithm: config.algorithm,
            expiration: config.expiration,
        }
    }

    /// Sign a fresh credential for `subject` carrying `scopes`.
    ///
    /// # Errors
    ///
    /// `Configuration` when the secret or algorithm is unset.
    pub fn sign(&self, subject: &str, scopes: &ScopeSet) -> BridgeResult<(String, LocalClaims)> {
        let claims = LocalClaims::new(subject, scopes, self.expiration);
        let token = self.sign_claims(&claims)?;
        Ok((token, claims))
    }

    /// Sign an already built claim set.
    ///
    /// # Errors
    ///
    /// `Configuration` when the secret or algorithm is unset, `Signing` when
    /// encoding fails.
    pub fn sign_claims(&self, claims: &LocalClaims) -> BridgeResult<String> {
        let (key, algorithm) = self.key()?;
        encode(&Header::new(algorithm.to_jwt()), claims, key)
            .map_err(|e| BridgeError::Signing(e.to_string()))
    }

    fn key(&self) -> BridgeResult<(&EncodingKey, SigningAlgorithm)> {
        let key = self
            .secret
            .as_ref()
            .ok_or_else(|| BridgeError::configuration("JWT_SECRET_KEY not configured"))?;
        let algorithm = self
            .algorithm
            .ok_or_else(|| BridgeError::configuration("JWT_ALGORITHM not configured"))?;
        Ok((key, algorithm))
    }
}
