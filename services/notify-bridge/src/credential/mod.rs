//! Scoped credential issuance and verification.
//!
//! Two strategies exist: local HMAC signing for internal callers, and
//! delegation to the notification platform's token endpoint for embeddable
//! widgets. The strategy is a property of the [`Purpose`](crate::scope::Purpose),
//! never a runtime switch.

pub mod claims;
pub mod issuer;
pub mod signer;
pub mod verifier;

pub use claims::{AUDIENCE, LOCAL_ISSUER, LocalClaims};
pub use issuer::{Credential, CredentialIssuer, IssuanceStrategy, REMOTE_EXPIRES_IN};
pub use signer::LocalSigner;
pub use verifier::CredentialVerifier;
