//! Authentication error types.

use axum::http::StatusCode;
use thiserror::Error;

use swiftcart_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password combination is wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Email format is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Phone number fails the 10-digit rule for vendors and agents.
    #[error("invalid phone number")]
    InvalidPhone,

    /// Password doesn't meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Bearer token is missing from the request.
    #[error("no token provided")]
    MissingToken,

    /// Bearer token failed verification or has expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Token creation failed.
    #[error("token creation failed: {0}")]
    TokenCreation(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Underlying repository error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::MissingToken | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            // "User already exists" is surfaced as 400 for wire compatibility
            // with the original API.
            Self::UserAlreadyExists
            | Self::InvalidEmail(_)
            | Self::InvalidPhone
            | Self::WeakPassword(_) => StatusCode::BAD_REQUEST,
            Self::TokenCreation(_) | Self::Hashing(_) | Self::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::UserAlreadyExists => "User already exists".to_string(),
            Self::InvalidEmail(e) => e.to_string(),
            Self::InvalidPhone => "Phone number must be exactly 10 digits".to_string(),
            Self::WeakPassword(msg) => msg.clone(),
            Self::MissingToken => "No token provided".to_string(),
            Self::InvalidToken => "Invalid or expired token".to_string(),
            Self::TokenCreation(_) | Self::Hashing(_) | Self::Repository(_) => {
                "Internal server error".to_string()
            }
        }
    }
}
