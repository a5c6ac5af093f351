use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::api::{ApiJson, ApiQuery, AppState, AuthenticatedSubject};
use crate::credential::Credential;
use crate::error::BridgeResult;
use crate::platform::UserProfile;
use crate::scope::{Purpose, ScopeRequest};

#[derive(Debug, Serialize)]
pub struct CredentialResponse {
    pub credential: String,
    pub subject: String,
}

impl From<Credential> for CredentialResponse {
    fn from(credential: Credential) -> Self {
        Self {
            credential: credential.token,
            subject: credential.subject,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateJwtQuery {
    pub brand_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdated {
    pub subject: String,
    pub status: &'static str,
}

pub async fn inbox_jwt(
    State(state): State<AppState>,
    AuthenticatedSubject(subject): AuthenticatedSubject,
) -> BridgeResult<Json<CredentialResponse>> {
    let credential = state
        .issuer
        .issue_for(ScopeRequest::new(subject, Purpose::Inbox))
        .await?;
    Ok(Json(credential.into()))
}

pub async fn create_jwt(
    State(state): State<AppState>,
    AuthenticatedSubject(subject): AuthenticatedSubject,
    ApiQuery(query): ApiQuery<CreateJwtQuery>,
) -> BridgeResult<Json<CredentialResponse>> {
    let mut request = ScopeRequest::new(subject, Purpose::Create);
    request.brand_id = query.brand_id.filter(|b| !b.is_empty());

    let credential = state.issuer.issue_for(request).await?;
    Ok(Json(credential.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedSubject(subject): AuthenticatedSubject,
    ApiJson(profile): ApiJson<UserProfile>,
) -> BridgeResult<Json<ProfileUpdated>> {
    state.platform.replace_profile(&subject, &profile).await?;
    Ok(Json(ProfileUpdated {
        subject,
        status: "updated",
    }))
}
