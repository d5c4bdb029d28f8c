//! Custom error types specific to authentication failures.
//!
//! This module defines the errors that can occur while logging in, issuing
//! or validating session tokens and hashing passwords, and how each one is
//! reported through [`ApiError`].

use thiserror::Error;
use tracing::warn;

use crate::errors::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No Authorization header or bearer token present.
    #[error("missing authentication token")]
    MissingToken,

    /// Token could not be decoded or its signature did not verify.
    #[error("invalid session token: {0}")]
    InvalidToken(String),

    #[error("session token has expired")]
    Expired,

    /// Unknown email or wrong password. Deliberately not distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("failed to issue session token: {0}")]
    TokenIssue(String),
}

impl AuthError {
    /// Whether this error should result in a 401 (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::InvalidToken(_)
                | AuthError::Expired
                | AuthError::InvalidCredentials
        )
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidToken(err.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AuthError::Hashing(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            e if e.is_client_error() => {
                warn!("Authentication failed: {e}");
                ApiError::Unauthorized
            }
            e => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_auth_error_display() {
        assert_eq!(AuthError::MissingToken.to_string(), "missing authentication token");
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_is_client_error() {
        assert!(AuthError::MissingToken.is_client_error());
        assert!(AuthError::Expired.is_client_error());
        assert!(!AuthError::Hashing("cost".into()).is_client_error());
    }

    #[test]
    fn test_conversion_to_api_error() {
        assert_eq!(ApiError::from(AuthError::Expired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials).to_string(),
            "Invalid credentials"
        );
        assert_eq!(
            ApiError::from(AuthError::TokenIssue("key".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
