// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::ValidationErrors;

use crate::auth::{AuthError, TokenError};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Machine-readable code, set for errors that carry one (auth failures).
    pub code: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

/// Claim lookups inside handlers keep the auth error's status, message and code.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.status_code(), err.to_string()).with_code(err.error_code())
    }
}

/// Issuing a token only fails on bad claims, which is a server bug.
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        tracing::error!(error = %err, "failed to issue token");
        Self::internal("Failed to issue token")
    }
}

/// Reports the first failing field's message.
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .flat_map(|(_, errors)| errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request".to_string());
        Self::bad_request(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code,
        });
        (self.status, body).into_response()
    }
}
