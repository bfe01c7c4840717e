// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token signature and expiry verification.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use serde::de::IgnoredAny;

use super::claims::ClaimSet;
use super::codec::{self, TokenCodec};
use super::purpose::{AppSecret, TokenPurpose};

/// Result of verifying one token.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    /// Authentic and unexpired.
    Valid(ClaimSet),
    /// Authentic, but `exp` has passed.
    Expired,
    /// Not a token.
    Malformed,
    /// Forged, tampered with, or signed for another purpose.
    SignatureInvalid,
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid(_))
    }
}

/// Verifies tokens against purpose-derived keys.
///
/// Holds only the read-only secret, so one instance is shared freely across
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    secret: AppSecret,
}

impl TokenVerifier {
    pub fn new(secret: AppSecret) -> Self {
        Self { secret }
    }

    /// Verify `token` for `purpose` against the current time.
    pub fn verify(&self, token: &str, purpose: TokenPurpose) -> VerificationOutcome {
        self.verify_at(token, purpose, Utc::now().timestamp_millis())
    }

    /// Verify `token` for `purpose` as of `now_ms` (milliseconds since epoch).
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// structure, then signature, then expiry.
    pub fn verify_at(&self, token: &str, purpose: TokenPurpose, now_ms: i64) -> VerificationOutcome {
        let Ok(decoded) = TokenCodec::decode(token) else {
            return VerificationOutcome::Malformed;
        };

        let key = self.secret.signing_key(purpose).decoding_key();
        if let Err(e) = jsonwebtoken::decode::<IgnoredAny>(token, &key, &codec::validation()) {
            return match e.kind() {
                // An undecodable signature cannot match any key.
                ErrorKind::InvalidSignature | ErrorKind::Base64(_) => {
                    VerificationOutcome::SignatureInvalid
                }
                _ => VerificationOutcome::Malformed,
            };
        }

        match decoded.expires_at {
            Some(expires_at) if now_ms > expires_at => VerificationOutcome::Expired,
            _ => VerificationOutcome::Valid(decoded.claims),
        }
    }
}
