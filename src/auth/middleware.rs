// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Layered onto individual routes by [`super::SecuredRoutes`]; routes that
//! do not declare [`HandlerCapability::with_auth_token`](super::HandlerCapability::with_auth_token)
//! never see it.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthTokenPayload, HandlerCapability, RequestAuthenticator};

/// Per-route middleware state.
#[derive(Clone)]
pub struct RouteGuard {
    pub authenticator: Arc<RequestAuthenticator>,
    /// Whether the handler declared an identity sink.
    pub inject_payload: bool,
}

impl RouteGuard {
    pub fn new(authenticator: Arc<RequestAuthenticator>, capability: HandlerCapability) -> Self {
        Self {
            authenticator,
            inject_payload: capability.injects_payload(),
        }
    }
}

/// Authenticate the request before the handler runs.
///
/// On failure the handler is never called and the [`AuthError`](super::AuthError)
/// becomes the response. On success the decoded payload is attached to the
/// request if the route has an identity sink, and dropped otherwise.
pub async fn with_auth_token(
    State(guard): State<RouteGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    match guard.authenticator.authenticate(request.headers()) {
        Ok(decoded) => {
            if guard.inject_payload {
                request.extensions_mut().insert(AuthTokenPayload(decoded));
            }
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                path = %request.uri().path(),
                error_code = e.error_code(),
                "request rejected by authentication"
            );
            e.into_response()
        }
    }
}
