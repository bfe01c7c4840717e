// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Shared-secret HS256 JWT bearer tokens with per-purpose keys.
//!
//! ## Auth Flow
//!
//! 1. `POST /login` issues an authentication token (15 days)
//! 2. The client sends it back in the `authentication-token` header
//! 3. On routes registered with [`HandlerCapability::with_auth_token`] or
//!    as an [`IdentityRoute`] the middleware:
//!    - reads the header (absent: `token_not_specified`)
//!    - checks structure, then signature, then expiry
//!      (`invalid_token` / `auth_token_expired`)
//!    - decodes the claims and, on identity routes, hands them to the
//!      handler's first parameter as [`AuthTokenPayload`]
//!
//! ## Security
//!
//! - Signing key is `APP_SECRET || purpose marker`, so confirmation tokens
//!   cannot authenticate and vice versa
//! - Malformed and forged tokens are indistinguishable to the client
//! - No revocation: a token is honored until its `exp`

pub mod authenticator;
pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod issuer;
pub mod marker;
pub mod middleware;
pub mod purpose;
pub mod routes;
pub mod verifier;

pub use authenticator::{RequestAuthenticator, AUTH_TOKEN_HEADER};
pub use claims::{ClaimSet, ClaimValue, DecodedToken, EMAIL_CLAIM, USER_ID_CLAIM};
pub use codec::{TokenCodec, TokenError};
pub use error::AuthError;
pub use extractor::AuthTokenPayload;
pub use identity::{IdentityHandler, IdentityRoute};
pub use issuer::TokenIssuer;
pub use marker::{HandlerCapability, MarkerError};
pub use purpose::{AppSecret, TokenPurpose};
pub use routes::SecuredRoutes;
pub use verifier::{TokenVerifier, VerificationOutcome};
