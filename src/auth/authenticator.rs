// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request authentication: locate, verify and decode the bearer token.

use axum::http::HeaderMap;
use chrono::Utc;

use super::claims::DecodedToken;
use super::codec::TokenCodec;
use super::purpose::{AppSecret, TokenPurpose};
use super::verifier::{TokenVerifier, VerificationOutcome};
use super::AuthError;

/// Header carrying the authentication token.
pub const AUTH_TOKEN_HEADER: &str = "authentication-token";

/// Authenticates inbound requests.
///
/// Stateless apart from the read-only secret: every call re-verifies the
/// signature, nothing is cached between requests.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    verifier: TokenVerifier,
}

impl RequestAuthenticator {
    pub fn new(secret: AppSecret) -> Self {
        Self {
            verifier: TokenVerifier::new(secret),
        }
    }

    /// The verifier used for authentication tokens. Confirmation flows reuse
    /// it with their own purpose.
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Read the token from [`AUTH_TOKEN_HEADER`].
    ///
    /// A header that is present but not visible ASCII cannot hold a token and
    /// counts as invalid, not as missing.
    pub fn locate_token(headers: &HeaderMap) -> Result<&str, AuthError> {
        headers
            .get(AUTH_TOKEN_HEADER)
            .ok_or(AuthError::TokenNotSpecified)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Authenticate a request as of now.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<DecodedToken, AuthError> {
        self.authenticate_at(headers, Utc::now().timestamp_millis())
    }

    /// Authenticate a request as of `now_ms`.
    ///
    /// Returns the decoded claims for the handler. Identity claims are not
    /// checked here; handlers that need `uid` ask for it.
    pub fn authenticate_at(&self, headers: &HeaderMap, now_ms: i64) -> Result<DecodedToken, AuthError> {
        let token = Self::locate_token(headers)?;

        match self
            .verifier
            .verify_at(token, TokenPurpose::Authentication, now_ms)
        {
            VerificationOutcome::Valid(_) => {}
            VerificationOutcome::Expired => return Err(AuthError::AuthTokenExpired),
            VerificationOutcome::Malformed | VerificationOutcome::SignatureInvalid => {
                return Err(AuthError::InvalidToken)
            }
        }

        // Decoded separately from the trust check; a failure here is still
        // an invalid token.
        TokenCodec::decode(token).map_err(|_| AuthError::InvalidToken)
    }
}
