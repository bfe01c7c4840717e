// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decoded authentication token handed to identity handlers.
//!
//! `AuthTokenPayload` is not an extractor of its own. A handler receives it
//! by taking it as its first parameter and being registered through
//! [`IdentityRoute`](super::IdentityRoute), which is also what makes the
//! route inject it:
//!
//! ```rust,ignore
//! async fn get_user(
//!     payload: AuthTokenPayload,
//!     State(state): State<AppState>,
//! ) -> Result<Json<UserResponse>, ApiError> {
//!     let user_id = payload.user_id()?;
//!     // ...
//! }
//! ```
//!
//! Outside an identity route the type cannot appear in a handler signature:
//!
//! ```rust,compile_fail
//! use axum::routing::{get, MethodRouter};
//! use neurotriumph_server::auth::AuthTokenPayload;
//!
//! async fn whoami(payload: AuthTokenPayload) -> String {
//!     format!("{:?}", payload.user_id())
//! }
//!
//! let _: MethodRouter = get(whoami);
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::claims::{ClaimSet, DecodedToken};
use super::AuthError;
use crate::error::ApiError;

/// Decoded payload of the request's authentication token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthTokenPayload(pub DecodedToken);

impl AuthTokenPayload {
    pub fn claims(&self) -> &ClaimSet {
        &self.0.claims
    }

    /// The `uid` claim.
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.0.claims.user_id()
    }
}

/// Reads the payload placed in the request extensions by
/// [`super::middleware::with_auth_token`]. Only used by identity routes.
#[derive(Debug)]
pub(crate) struct InjectedPayload(pub AuthTokenPayload);

impl<S> FromRequestParts<S> for InjectedPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .remove::<AuthTokenPayload>()
            .map(InjectedPayload)
            .ok_or_else(|| {
                tracing::error!(
                    path = %parts.uri.path(),
                    "identity route reached without an injected payload"
                );
                ApiError::internal("Authentication is not configured for this route")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::USER_ID_CLAIM;
    use axum::http::{Request, StatusCode};

    fn parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    fn payload() -> AuthTokenPayload {
        AuthTokenPayload(DecodedToken {
            claims: ClaimSet::new().with(USER_ID_CLAIM, 42_i64),
            expires_at: None,
        })
    }

    #[tokio::test]
    async fn reads_payload_from_extensions() {
        let mut parts = parts();
        parts.extensions.insert(payload());

        let InjectedPayload(extracted) =
            <InjectedPayload as FromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .unwrap();
        assert_eq!(extracted.user_id(), Ok(42));
    }

    #[tokio::test]
    async fn payload_is_taken_once() {
        let mut parts = parts();
        parts.extensions.insert(payload());

        <InjectedPayload as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(parts.extensions.get::<AuthTokenPayload>().is_none());
    }

    #[tokio::test]
    async fn missing_payload_is_a_server_error() {
        let mut parts = parts();
        let rejection =
            <InjectedPayload as FromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .unwrap_err();
        assert_eq!(rejection.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn user_id_reads_uid_claim() {
        assert_eq!(payload().user_id(), Ok(42));
        let empty = AuthTokenPayload(DecodedToken {
            claims: ClaimSet::new(),
            expires_at: None,
        });
        assert!(matches!(empty.user_id(), Err(AuthError::ClaimMissing(_))));
    }
}
