use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::BridgeError;

/// Error envelope returned by every route.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code
    pub error: String,
    /// Human-readable message
    pub message: String,
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Configuration(_) | Self::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if self.is_client_error() {
            debug!(code = self.code(), error = %self, "Request rejected");
        } else {
            error!(code = self.code(), error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
