use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::SigningConfig;
use crate::credential::signer::LocalSigner;
use crate::error::{BridgeError, BridgeResult};
use crate::metrics;
use crate::platform::{IssueTokenRequest, PlatformClient};
use crate::scope::{Purpose, ScopeRequest, ScopeSet, build_scopes, internal_scopes};

/// Lifetime requested for remotely issued credentials.
pub const REMOTE_EXPIRES_IN: &str = "30 days";

const REMOTE_TTL_DAYS: i64 = 30;

/// How a credential is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssuanceStrategy {
    /// Signed in-process with the configured secret.
    LocalSigning,
    /// Minted by the platform's token endpoint.
    RemoteIssuance,
}

impl IssuanceStrategy {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocalSigning => "local_signing",
            Self::RemoteIssuance => "remote_issuance",
        }
    }
}

/// A freshly minted bearer credential. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Bearer token
    pub token: String,
    /// Subject the credential was minted for
    pub subject: String,
    /// Strategy that produced it
    pub strategy: IssuanceStrategy,
    /// Scopes granted
    pub scopes: ScopeSet,
    /// Expiry (claimed for local credentials, by convention for remote ones)
    pub expires_at: DateTime<Utc>,
}

/// Mints credentials, choosing the strategy from the purpose.
pub struct CredentialIssuer {
    signer: LocalSigner,
    platform: Arc<PlatformClient>,
}

impl CredentialIssuer {
    /// Create an issuer over the signing configuration and the platform client.
    #[must_use]
    pub fn new(signing: &SigningConfig, platform: Arc<PlatformClient>) -> Self {
        Self {
            signer: LocalSigner::new(signing),
            platform,
        }
    }

    /// Compose the scopes for `request` and issue a credential for them.
    ///
    /// When the request names no tenant, the configured tenant is used. A
    /// remotely issued credential is bound to the same tenant its scopes name.
    ///
    /// # Errors
    ///
    /// See [`CredentialIssuer::issue`].
    pub async fn issue_for(&self, mut request: ScopeRequest) -> BridgeResult<Credential> {
        request.tenant_id = request
            .tenant_id
            .filter(|t| !t.is_empty())
            .or_else(|| self.platform.tenant_id().map(ToString::to_string));
        let scopes = build_scopes(&request);
        self.dispatch(
            &request.subject,
            &scopes,
            request.purpose,
            request.tenant_id.as_deref(),
        )
        .await
    }

    /// Issue a credential for `subject` with exactly `scopes`.
    ///
    /// Remote issuance performs one outbound call and is never retried; the
    /// token is bound to the configured tenant.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty subject
    /// - `Configuration` when the chosen strategy lacks its secret, API key or tenant
    /// - `Upstream` when the token endpoint fails or omits the token
    pub async fn issue(
        &self,
        subject: &str,
        scopes: &ScopeSet,
        purpose: Purpose,
    ) -> BridgeResult<Credential> {
        self.dispatch(subject, scopes, purpose, None).await
    }

    #[instrument(skip(self, scopes), fields(strategy = purpose.strategy().as_str()))]
    async fn dispatch(
        &self,
        subject: &str,
        scopes: &ScopeSet,
        purpose: Purpose,
        tenant_id: Option<&str>,
    ) -> BridgeResult<Credential> {
        if subject.trim().is_empty() {
            return Err(BridgeError::validation("Subject must not be empty"));
        }

        let strategy = purpose.strategy();
        let credential = match strategy {
            IssuanceStrategy::LocalSigning => self.sign_local(subject, scopes)?,
            IssuanceStrategy::RemoteIssuance => {
                self.issue_remote(subject, scopes, tenant_id).await?
            }
        };

        metrics::record_credential_issued(strategy.as_str(), purpose.as_str());
        info!(subject, purpose = %purpose, "Issued credential");
        Ok(credential)
    }

    /// Sign an internal credential, defaulting to the minimal scope set.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty subject, `Configuration` when signing is
    /// not configured.
    pub fn sign_internal(
        &self,
        subject: &str,
        scopes: Option<ScopeSet>,
    ) -> BridgeResult<Credential> {
        if subject.trim().is_empty() {
            return Err(BridgeError::validation("Subject must not be empty"));
        }
        let scopes = scopes
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| internal_scopes(subject));
        let credential = self.sign_local(subject, &scopes)?;

        metrics::record_credential_issued(
            IssuanceStrategy::LocalSigning.as_str(),
            Purpose::Internal.as_str(),
        );
        Ok(credential)
    }

    fn sign_local(&self, subject: &str, scopes: &ScopeSet) -> BridgeResult<Credential> {
        let (token, claims) = self.signer.sign(subject, scopes)?;
        Ok(Credential {
            token,
            subject: subject.to_string(),
            strategy: IssuanceStrategy::LocalSigning,
            scopes: scopes.clone(),
            expires_at: claims.expires_at(),
        })
    }

    async fn issue_remote(
        &self,
        subject: &str,
        scopes: &ScopeSet,
        tenant_id: Option<&str>,
    ) -> BridgeResult<Credential> {
        let tenant_id = tenant_id
            .or_else(|| self.platform.tenant_id())
            .ok_or_else(|| BridgeError::configuration("COURIER_TENANT_ID not configured"))?;

        let request = IssueTokenRequest {
            scope: scopes.joined(),
            expires_in: REMOTE_EXPIRES_IN.to_string(),
            tenant_id: Some(tenant_id.to_string()),
        };
        let token = self.platform.issue_token(&request).await?;

        Ok(Credential {
            token,
            subject: subject.to_string(),
            strategy: IssuanceStrategy::RemoteIssuance,
            scopes: scopes.clone(),
            expires_at: Utc::now() + chrono::Duration::days(REMOTE_TTL_DAYS),
        })
    }
}
