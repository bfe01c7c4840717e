// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance for login and confirmation flows.

use std::time::Duration;

use chrono::Utc;

use super::claims::{ClaimSet, EMAIL_CLAIM, USER_ID_CLAIM};
use super::codec::{TokenCodec, TokenError};
use super::purpose::{AppSecret, TokenPurpose};
use crate::config::{AUTH_TOKEN_LIFETIME, CONFIRMATION_TOKEN_LIFETIME};

/// Mints tokens with the lifetime that belongs to their purpose.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: TokenCodec,
}

impl TokenIssuer {
    pub fn new(secret: AppSecret) -> Self {
        Self {
            codec: TokenCodec::new(secret),
        }
    }

    /// Bearer token returned by a successful login.
    pub fn authentication_token(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue(
            TokenPurpose::Authentication,
            ClaimSet::new().with(USER_ID_CLAIM, user_id),
            AUTH_TOKEN_LIFETIME,
        )
    }

    /// Token mailed after registration.
    pub fn email_confirmation_token(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue(
            TokenPurpose::EmailConfirmation,
            ClaimSet::new().with(USER_ID_CLAIM, user_id),
            CONFIRMATION_TOKEN_LIFETIME,
        )
    }

    /// Token mailed to the new address of a pending email change.
    pub fn email_change_token(&self, user_id: i64, new_email: &str) -> Result<String, TokenError> {
        self.issue(
            TokenPurpose::EmailChangeConfirmation,
            ClaimSet::new()
                .with(USER_ID_CLAIM, user_id)
                .with(EMAIL_CLAIM, new_email),
            CONFIRMATION_TOKEN_LIFETIME,
        )
    }

    fn issue(
        &self,
        purpose: TokenPurpose,
        claims: ClaimSet,
        lifetime: Duration,
    ) -> Result<String, TokenError> {
        let lifetime_ms = i64::try_from(lifetime.as_millis()).unwrap_or(i64::MAX);
        let expires_at = Utc::now().timestamp_millis().saturating_add(lifetime_ms);
        self.codec.encode(purpose, &claims, Some(expires_at))
    }
}
