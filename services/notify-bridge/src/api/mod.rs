//! Inbound HTTP surface.
//!
//! Every `/api` route requires a locally signed bearer credential; the
//! subject it carries is the caller's remote-platform identity.

mod auth;
mod error;
mod extract;
mod messaging;
mod templates;
mod users;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::credential::{CredentialIssuer, CredentialVerifier};
use crate::error::BridgeResult;
use crate::metrics;
use crate::platform::PlatformClient;

pub use auth::AuthenticatedSubject;
pub use error::ErrorResponse;
pub use extract::{ApiJson, ApiQuery};

/// Shared handler state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Credential issuer
    pub issuer: Arc<CredentialIssuer>,
    /// Verifier for inbound bearer credentials
    pub verifier: Arc<CredentialVerifier>,
    /// Notification platform client
    pub platform: Arc<PlatformClient>,
}

impl AppState {
    /// Wire issuer, verifier and client from one configuration.
    ///
    /// # Errors
    ///
    /// `Configuration` if the platform client cannot be built.
    pub fn from_config(config: &Config) -> BridgeResult<Self> {
        let platform = Arc::new(PlatformClient::new(&config.platform)?);
        let issuer = Arc::new(CredentialIssuer::new(&config.signing, Arc::clone(&platform)));
        let verifier = Arc::new(CredentialVerifier::new(&config.signing));
        Ok(Self {
            issuer,
            verifier,
            platform,
        })
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/users/inbox-jwt", get(users::inbox_jwt))
        .route("/users/create-jwt", get(users::create_jwt))
        .route("/users/profile", put(users::update_profile))
        .route("/messaging/send", post(messaging::send_message))
        .route("/messaging/send-welcome", post(messaging::send_welcome))
        .route("/messaging/send-demo", post(messaging::send_demo))
        .route(
            "/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/templates/{template_id}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/brands", get(templates::list_brands))
        .route("/brands/{brand_id}", get(templates::get_brand));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "platform_configured": state.platform.is_available(),
    }))
}

async fn metrics_text() -> impl IntoResponse {
    match metrics::render() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
