// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-route authentication capabilities.
//!
//! A route declares up front whether it requires a token and whether its
//! handler takes the decoded payload (the identity sink, an
//! [`AuthTokenPayload`](super::AuthTokenPayload) parameter). The sink facet
//! is set by [`SecuredRoutes::identity_route`](super::SecuredRoutes::identity_route),
//! whose handlers are typed to take the payload. Declarations are checked
//! when the router is built, so a misconfigured route stops the server at
//! startup instead of failing requests.

use thiserror::Error;

/// Misconfigured capability, reported at route registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkerError {
    #[error("route '{route}' declares {count} identity sinks, at most one is allowed")]
    MultipleIdentitySinks { route: String, count: u8 },

    #[error("route '{route}' declares an identity sink without requiring authentication")]
    SinkWithoutAuthentication { route: String },

    #[error("route '{route}' declares an identity sink but its handlers do not take one; register it as an identity route")]
    UntypedIdentitySink { route: String },
}

/// What a route needs from the authentication layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerCapability {
    requires_auth: bool,
    identity_sinks: u8,
}

impl HandlerCapability {
    /// No token required.
    pub const fn public() -> Self {
        Self {
            requires_auth: false,
            identity_sinks: 0,
        }
    }

    /// Token required; the decoded payload is dropped after verification.
    pub const fn with_auth_token() -> Self {
        Self {
            requires_auth: true,
            identity_sinks: 0,
        }
    }

    /// Token required and handed to the handler. What identity routes use.
    pub const fn identity() -> Self {
        Self::with_auth_token().auth_token_payload()
    }

    /// Declare a parameter that receives the decoded payload.
    pub const fn auth_token_payload(self) -> Self {
        Self {
            requires_auth: self.requires_auth,
            identity_sinks: self.identity_sinks.saturating_add(1),
        }
    }

    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    /// Whether the handler receives the decoded payload.
    pub fn injects_payload(&self) -> bool {
        self.identity_sinks > 0
    }

    pub fn validate(&self, route: &str) -> Result<(), MarkerError> {
        if self.identity_sinks > 1 {
            return Err(MarkerError::MultipleIdentitySinks {
                route: route.to_string(),
                count: self.identity_sinks,
            });
        }
        if self.identity_sinks == 1 && !self.requires_auth {
            return Err(MarkerError::SinkWithoutAuthentication {
                route: route.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_route_is_valid() {
        let capability = HandlerCapability::public();
        assert!(!capability.requires_auth());
        assert!(!capability.injects_payload());
        assert!(capability.validate("/nn/{page}").is_ok());
    }

    #[test]
    fn authenticated_route_with_one_sink_is_valid() {
        let capability = HandlerCapability::identity();
        assert_eq!(capability, HandlerCapability::with_auth_token().auth_token_payload());
        assert!(capability.requires_auth());
        assert!(capability.injects_payload());
        assert!(capability.validate("/user").is_ok());
    }

    #[test]
    fn two_sinks_are_rejected() {
        let capability = HandlerCapability::with_auth_token()
            .auth_token_payload()
            .auth_token_payload();
        assert_eq!(
            capability.validate("/user"),
            Err(MarkerError::MultipleIdentitySinks {
                route: "/user".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn sink_without_auth_is_rejected() {
        let capability = HandlerCapability::public().auth_token_payload();
        assert!(matches!(
            capability.validate("/user"),
            Err(MarkerError::SinkWithoutAuthentication { .. })
        ));
    }
}
