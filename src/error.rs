//! HTTP-facing error type.
//!
//! Domain errors are translated into status codes and a uniform JSON body:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Profile not found", "details": { "id": 999 } } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::errors::ProfileError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    BadGateway { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn bad_gateway(message: impl Into<String>, details: Value) -> Self {
        Self::BadGateway {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::NotFound { id } | ProfileError::UpstreamNotFound { id } => {
                AppError::not_found("Profile not found", json!({ "id": id }))
            }
            ProfileError::UpstreamUnavailable { reason } => {
                tracing::warn!(%reason, "Upstream unavailable");
                AppError::bad_gateway("Upstream unavailable", json!({ "reason": reason }))
            }
            ProfileError::Normalization { reason } => {
                tracing::error!(%reason, "Malformed upstream payload");
                AppError::bad_gateway("Malformed upstream payload", json!({ "reason": reason }))
            }
            ProfileError::Store { reason } => {
                tracing::error!(%reason, "Profile store failure");
                AppError::internal("Database error", json!({}))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(e.field_errors()).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Invalid request parameters", details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::BadGateway { message, details } => ("upstream_error", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mapping() {
        let err = AppError::from(ProfileError::NotFound { id: 999 });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = AppError::from(ProfileError::UpstreamNotFound { id: 999 });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_errors_are_bad_gateway() {
        let err = AppError::from(ProfileError::upstream_unavailable("request timed out"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let err = AppError::from(ProfileError::normalization("missing field `id`"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_validation_errors_are_bad_request() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("ttlSeconds", validator::ValidationError::new("range"));

        let err = AppError::from(errors);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_error_hides_details() {
        let err = AppError::from(ProfileError::store("password authentication failed"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        match err {
            AppError::Internal { details, .. } => assert_eq!(details, json!({})),
            other => panic!("unexpected {other:?}"),
        }
    }
}
