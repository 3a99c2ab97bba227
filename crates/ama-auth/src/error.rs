//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    #[error("Missing refresh cookie")]
    MissingRefreshCookie,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Unknown user")]
    UnknownUser,

    #[error("Token lifetime exceeds the representable date range")]
    LifetimeOverflow,

    #[error("Token signing error: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("User store error: {0}")]
    Store(#[from] StoreError),
}

/// Caller-facing category of an [`AuthError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Bad email/password on login
    InvalidCredentials,
    /// Missing, malformed, invalid or expired token
    Unauthorized,
    /// Valid token whose subject no longer resolves to a user
    UnknownUser,
    /// Signing, hashing or storage failure not attributable to the caller
    Internal,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MissingRefreshCookie
            | AuthError::InvalidToken
            | AuthError::TokenExpired => AuthErrorKind::Unauthorized,
            AuthError::UnknownUser => AuthErrorKind::UnknownUser,
            AuthError::LifetimeOverflow
            | AuthError::Signing(_)
            | AuthError::PasswordHash(_)
            | AuthError::Store(_) => AuthErrorKind::Internal,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Messages stay generic so responses never reveal which check failed
        let (status, message) = match self.kind() {
            AuthErrorKind::InvalidCredentials => (StatusCode::BAD_REQUEST, "invalid credentials"),
            AuthErrorKind::Unauthorized | AuthErrorKind::UnknownUser => {
                (StatusCode::UNAUTHORIZED, "unauthorized")
            }
            AuthErrorKind::Internal => {
                error!("Authentication internal error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        };

        let body = axum::Json(json!({
            "error": true,
            "message": message
        }));

        (status, body).into_response()
    }
}
