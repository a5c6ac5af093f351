//! Claim set of locally signed credentials.
//!
//! `sub`, `iss`, `aud`, `iat`, `exp` and `scope` are required when decoding.
//! `jti` is always written but may be absent from credentials minted elsewhere
//! with the same secret.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::scope::ScopeSet;

/// Issuer claim of locally signed credentials.
pub const LOCAL_ISSUER: &str = "notify-bridge";

/// Audience claim of locally signed credentials.
pub const AUDIENCE: &str = "courier";

/// Claim set of a locally signed credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalClaims {
    /// Subject (remote-platform user id)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique credential id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jti: String,
    /// Space-joined scopes
    pub scope: String,
}

impl LocalClaims {
    /// Claims issued now, expiring after `ttl`.
    #[must_use]
    pub fn new(subject: impl Into<String>, scopes: &ScopeSet, ttl: Duration) -> Self {
        Self::issued_at(subject, scopes, ttl, Utc::now())
    }

    /// Claims issued at `issued_at`, expiring after `ttl`.
    #[must_use]
    pub fn issued_at(
        subject: impl Into<String>,
        scopes: &ScopeSet,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let iat = issued_at.timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            sub: subject.into(),
            iss: LOCAL_ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            exp: iat.saturating_add(ttl_secs),
            iat,
            jti: uuid::Uuid::new_v4().to_string(),
            scope: scopes.joined(),
        }
    }

    /// Scopes split back out of the `scope` claim.
    #[must_use]
    pub fn scopes(&self) -> ScopeSet {
        ScopeSet::from_joined(&self.scope)
    }

    /// `exp` as a timestamp.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
