// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Every variant is terminal for the request: the client has to obtain a new
/// token out of band, retrying the same one cannot succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No token in the authentication header
    TokenNotSpecified,
    /// Token is malformed, forged, or signed for another purpose
    InvalidToken,
    /// Token is authentic but past its expiry
    AuthTokenExpired,
    /// A required claim is absent or has the wrong type
    ClaimMissing(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::TokenNotSpecified => "token_not_specified",
            AuthError::InvalidToken => "invalid_token",
            AuthError::AuthTokenExpired => "auth_token_expired",
            AuthError::ClaimMissing(_) => "claim_missing",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::TokenNotSpecified => write!(f, "Authentication token is not specified"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::AuthTokenExpired => write!(f, "Authentication token has expired"),
            AuthError::ClaimMissing(claim) => write!(f, "Token is missing claim '{claim}'"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
