//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all graph endpoints. It
//! implements `axum::response::IntoResponse` to produce the JSON envelope
//! `{"success": false, "error": {code, message, details?}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use flowsync_storage::StorageError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VERSION_CONFLICT").
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Graph not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request or operation batch (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Stale base version (409). Carries the store's current version.
    #[error("version conflict: {message}")]
    VersionConflict {
        message: String,
        current_version: u64,
    },

    /// Resource already exists (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ApiErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorDetail {
                    code: "BAD_REQUEST".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
            ApiError::VersionConflict {
                message,
                current_version,
            } => (
                StatusCode::CONFLICT,
                ApiErrorDetail {
                    code: "VERSION_CONFLICT".to_string(),
                    message: message.clone(),
                    details: Some(serde_json::json!({ "current_version": current_version })),
                },
            ),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ApiErrorDetail {
                    code: "CONFLICT".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
        };

        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::GraphNotFound(_) => ApiError::NotFound(err.to_string()),
            StorageError::GraphExists(_) => ApiError::Conflict(err.to_string()),
            StorageError::VersionConflict {
                current_version, ..
            } => ApiError::VersionConflict {
                message: err.to_string(),
                current_version: *current_version,
            },
            StorageError::InvalidOperation { .. } => ApiError::BadRequest(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsync_core::{GraphId, GraphKey, WorkspaceId};

    fn key() -> GraphKey {
        GraphKey::new(WorkspaceId(uuid::Uuid::nil()), GraphId(uuid::Uuid::nil()))
    }

    #[test]
    fn storage_conflict_maps_to_409_with_version() {
        let err: ApiError = StorageError::VersionConflict {
            key: key(),
            base_version: 1,
            current_version: 3,
        }
        .into();
        assert!(matches!(
            err,
            ApiError::VersionConflict {
                current_version: 3,
                ..
            }
        ));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn missing_graph_maps_to_404() {
        let err: ApiError = StorageError::GraphNotFound(key()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
