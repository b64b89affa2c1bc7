//! HTTP rendering of `AppError`, enabled by the `axum` feature.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};

/// Message returned in place of internal error details.
const HIDDEN_MESSAGE: &str = "An internal error occurred";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// HTTP status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Storage | ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Cache
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AppError> for ApiErrorResponse {
    fn from(err: AppError) -> Self {
        let message = if err.kind.is_client_facing() {
            err.message
        } else {
            HIDDEN_MESSAGE.to_string()
        };
        Self {
            success: false,
            error: err.kind.to_string(),
            message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind);
        if status.is_server_error() {
            tracing::error!(kind = %self.kind, error = %self, source = ?self.source, "Request failed");
        }

        (status, Json(ApiErrorResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::Storage), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorKind::ExternalService), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(ErrorKind::ServiceUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        for kind in [
            ErrorKind::Internal,
            ErrorKind::Database,
            ErrorKind::Cache,
            ErrorKind::Configuration,
            ErrorKind::Serialization,
        ] {
            assert_eq!(status_for(kind), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let body = ApiErrorResponse::from(AppError::database("connection refused to 10.0.0.3"));
        assert_eq!(body.message, HIDDEN_MESSAGE);
        assert_eq!(body.error, "DATABASE");
        assert!(!body.success);
    }

    #[test]
    fn test_client_message_is_kept() {
        let body = ApiErrorResponse::from(AppError::not_found("Folder not found"));
        assert_eq!(body.message, "Folder not found");
        assert_eq!(body.error, "NOT_FOUND");
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::conflict("dup").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
