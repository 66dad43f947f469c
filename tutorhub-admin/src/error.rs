//! Admin API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Please provide both email and password")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing Authorization header")]
    MissingAuthorization,

    #[error("Invalid Authorization header")]
    MalformedAuthorization,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Forbidden: not an admin")]
    NotAdmin,

    #[error("Admin not found")]
    AdminNotFound,

    #[error("Application not found")]
    ApplicationNotFound,

    #[error("Linked account not found")]
    AccountNotFound,

    #[error("Invalid status")]
    InvalidReviewStatus,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Admin account has no password configured")]
    PasswordNotConfigured,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AdminError::MissingCredentials => {
                (StatusCode::BAD_REQUEST, "Please provide both email and password")
            }
            AdminError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            AdminError::MissingAuthorization => {
                (StatusCode::UNAUTHORIZED, "Missing Authorization header")
            }
            AdminError::MalformedAuthorization => {
                (StatusCode::UNAUTHORIZED, "Invalid Authorization header")
            }
            AdminError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AdminError::TokenRevoked => (StatusCode::UNAUTHORIZED, "Token has been revoked"),
            AdminError::NotAdmin => (StatusCode::FORBIDDEN, "Forbidden: not an admin"),
            AdminError::AdminNotFound => (StatusCode::NOT_FOUND, "Admin not found"),
            AdminError::ApplicationNotFound => (StatusCode::NOT_FOUND, "Application not found"),
            AdminError::AccountNotFound => (StatusCode::NOT_FOUND, "Linked account not found"),
            AdminError::InvalidReviewStatus => (StatusCode::BAD_REQUEST, "Invalid status"),
            AdminError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AdminError::PasswordNotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Admin account has no password configured",
            ),
            AdminError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({ "message": message });
        (status, axum::Json(body)).into_response()
    }
}
