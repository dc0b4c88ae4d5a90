//! # API Response Types
//!
//! JSON bodies for the non-RDF responses, and the error type every handler
//! returns.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gitlod_core::GitlodError;
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// FORMAT QUERY
// =============================================================================

/// `?format=nt|ttl` on every RDF endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatQuery {
    #[serde(default)]
    pub format: Option<String>,
}

// =============================================================================
// ERRORS
// =============================================================================

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error carrying the status it maps to.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<GitlodError> for ApiError {
    fn from(e: GitlodError) -> Self {
        let status = match &e {
            GitlodError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            GitlodError::RemoteFetchError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(%status, "{}", e);
        }
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_statuses() {
        let cases = [
            (GitlodError::RecordNotFound("user x".into()), StatusCode::NOT_FOUND),
            (GitlodError::RemoteFetchError("down".into()), StatusCode::BAD_GATEWAY),
            (
                GitlodError::SchemaResolutionError("bad".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (GitlodError::IoError("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status, status);
        }
    }
}
