// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route registration with per-route authentication.
//!
//! ```rust,ignore
//! let router = SecuredRoutes::new(authenticator)
//!     .route("/nn/{page}", HandlerCapability::public(), get(list_public))?
//!     .identity_route("/user", IdentityRoute::new().get(get_user).delete(delete_user))?
//!     .into_router();
//! ```

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::MethodRouter, Router};

use super::middleware::{with_auth_token, RouteGuard};
use super::{HandlerCapability, IdentityRoute, MarkerError, RequestAuthenticator};

/// Router builder that applies [`with_auth_token`] to routes that ask for it.
pub struct SecuredRoutes<S = ()> {
    router: Router<S>,
    authenticator: Arc<RequestAuthenticator>,
}

impl<S> SecuredRoutes<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(authenticator: Arc<RequestAuthenticator>) -> Self {
        Self {
            router: Router::new(),
            authenticator,
        }
    }

    /// Register a public or authenticated route whose handlers take no
    /// identity sink.
    ///
    /// Fails if the capability is misconfigured, including one that declares
    /// a sink: plain handlers cannot consume it, use
    /// [`identity_route`](Self::identity_route) instead. Registering several
    /// method routers under one path merges them, each keeping its own
    /// capability.
    pub fn route(
        self,
        path: &str,
        capability: HandlerCapability,
        method_router: MethodRouter<S>,
    ) -> Result<Self, MarkerError> {
        capability.validate(path)?;
        if capability.injects_payload() {
            return Err(MarkerError::UntypedIdentitySink {
                route: path.to_string(),
            });
        }
        Ok(self.register(path, capability, method_router))
    }

    /// Register handlers that take the decoded token as their first parameter.
    pub fn identity_route(self, path: &str, route: IdentityRoute<S>) -> Result<Self, MarkerError> {
        let capability = HandlerCapability::identity();
        capability.validate(path)?;
        Ok(self.register(path, capability, route.router))
    }

    fn register(
        mut self,
        path: &str,
        capability: HandlerCapability,
        method_router: MethodRouter<S>,
    ) -> Self {
        let method_router = if capability.requires_auth() {
            let guard = RouteGuard::new(self.authenticator.clone(), capability);
            method_router.route_layer(from_fn_with_state(guard, with_auth_token))
        } else {
            method_router
        };

        tracing::debug!(
            path,
            requires_auth = capability.requires_auth(),
            identity_sink = capability.injects_payload(),
            "registered route"
        );

        self.router = self.router.route(path, method_router);
        self
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }
}
