//! Scope composition for widget and internal credentials.
//!
//! Scopes are built here and never parsed back into structure; a credential
//! carries them as one space-joined string.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::credential::IssuanceStrategy;

/// What a credential will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    /// Embedded inbox widget, read-only.
    Inbox,
    /// Embedded template and brand designer.
    Create,
    /// Service-to-service access to this backend.
    Internal,
}

impl Purpose {
    /// The issuance strategy bound to this purpose.
    #[must_use]
    pub const fn strategy(self) -> IssuanceStrategy {
        match self {
            Self::Inbox | Self::Create => IssuanceStrategy::RemoteIssuance,
            Self::Internal => IssuanceStrategy::LocalSigning,
        }
    }

    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Create => "create",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of scope strings.
///
/// Insertion order is kept; inserting a scope already present is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeSet(Vec<String>);

impl ScopeSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Split a space-joined scope string.
    #[must_use]
    pub fn from_joined(joined: &str) -> Self {
        joined.split_whitespace().collect()
    }

    /// Insert a scope unless already present.
    pub fn insert(&mut self, scope: impl Into<String>) {
        let scope = scope.into();
        if !scope.is_empty() && !self.0.contains(&scope) {
            self.0.push(scope);
        }
    }

    /// Whether the set holds `scope`.
    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.0.iter().any(|s| s == scope)
    }

    /// Number of scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate scopes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Space-joined form used in the `scope` claim and the issuance request.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

impl<S: Into<String>> FromIterator<S> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for scope in iter {
            set.insert(scope);
        }
        set
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Input to [`build_scopes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRequest {
    /// Remote-platform user id
    pub subject: String,
    /// Access level requested
    pub purpose: Purpose,
    /// Narrow tenant scopes to this tenant
    pub tenant_id: Option<String>,
    /// Add scopes for this single brand (create purpose only)
    pub brand_id: Option<String>,
}

impl ScopeRequest {
    /// Create a request without tenant or brand narrowing.
    #[must_use]
    pub fn new(subject: impl Into<String>, purpose: Purpose) -> Self {
        Self {
            subject: subject.into(),
            purpose,
            tenant_id: None,
            brand_id: None,
        }
    }

    /// Narrow to a tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Narrow to a brand.
    #[must_use]
    pub fn with_brand(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }
}

/// `user_id:<subject>`, present in every scope set.
#[must_use]
pub fn subject_scope(subject: &str) -> String {
    format!("user_id:{subject}")
}

/// Default scopes for an internal credential.
#[must_use]
pub fn internal_scopes(subject: &str) -> ScopeSet {
    [subject_scope(subject), "read:messages".to_string()]
        .into_iter()
        .collect()
}

fn tenant_scope(tenant_id: Option<&str>, rest: &str) -> String {
    match tenant_id {
        Some(tenant) => format!("tenant:{tenant}:{rest}"),
        None => format!("tenant:{rest}"),
    }
}

/// Compose the scopes a credential for `request` must carry.
///
/// Empty tenant or brand ids are treated as absent. A brand id adds the
/// brand-specific pair; the tenant-wide brand scopes stay.
#[must_use]
pub fn build_scopes(request: &ScopeRequest) -> ScopeSet {
    let tenant = request.tenant_id.as_deref().filter(|t| !t.is_empty());
    let brand = request.brand_id.as_deref().filter(|b| !b.is_empty());
    let subject = request.subject.as_str();

    match request.purpose {
        Purpose::Inbox => [
            subject_scope(subject),
            "read:messages".to_string(),
            "inbox:read:messages".to_string(),
            tenant_scope(tenant, "read"),
            tenant_scope(tenant, "notification:read"),
        ]
        .into_iter()
        .collect(),
        Purpose::Create => {
            let mut scopes: ScopeSet = [
                subject_scope(subject),
                tenant_scope(tenant, "read"),
                tenant_scope(tenant, "notification:read"),
                tenant_scope(tenant, "notification:write"),
                tenant_scope(tenant, "brand:read"),
                tenant_scope(tenant, "brand:write"),
                "read:brands".to_string(),
                "write:brands".to_string(),
            ]
            .into_iter()
            .collect();

            if let Some(brand) = brand {
                scopes.insert(format!("read:brands:{brand}"));
                scopes.insert(format!("write:brands:{brand}"));
            }
            scopes
        }
        Purpose::Internal => internal_scopes(subject),
    }
}
