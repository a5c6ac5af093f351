use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::AppState;
use crate::error::BridgeError;

/// Subject of the verified bearer credential on the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSubject(pub String);

impl FromRequestParts<AppState> for AuthenticatedSubject {
    type Rejection = BridgeError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| BridgeError::invalid_credential("missing authorization header"))?;

        let token = header
            .split_once(' ')
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BridgeError::invalid_credential("invalid authorization header"))?;

        let claims = state.verifier.decode(token)?;
        Ok(Self(claims.sub))
    }
}
