// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token purposes and purpose-derived signing keys.
//!
//! Every token is signed with `app_secret || purpose_marker`. The marker is
//! fixed per purpose, so a token minted for one flow (say, email
//! confirmation) can never be replayed as an authentication token.

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};

/// What a token is allowed to be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    /// Bearer token presented on authenticated requests.
    Authentication,
    /// Confirms ownership of the email used at registration.
    EmailConfirmation,
    /// Confirms ownership of a new email address during an email change.
    EmailChangeConfirmation,
}

impl TokenPurpose {
    pub const ALL: [TokenPurpose; 3] = [
        TokenPurpose::Authentication,
        TokenPurpose::EmailConfirmation,
        TokenPurpose::EmailChangeConfirmation,
    ];

    /// Domain-separation suffix appended to the application secret.
    pub fn marker(&self) -> &'static str {
        match self {
            TokenPurpose::Authentication => "#authentication",
            TokenPurpose::EmailConfirmation => "#email-confirmation",
            TokenPurpose::EmailChangeConfirmation => "#email-change-confirmation",
        }
    }
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenPurpose::Authentication => write!(f, "authentication"),
            TokenPurpose::EmailConfirmation => write!(f, "email_confirmation"),
            TokenPurpose::EmailChangeConfirmation => write!(f, "email_change_confirmation"),
        }
    }
}

/// Process-wide application secret. Read-only after startup.
#[derive(Clone)]
pub struct AppSecret(Arc<str>);

impl AppSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Arc::from(secret.into()))
    }

    /// Derive the signing key for `purpose`.
    pub fn signing_key(&self, purpose: TokenPurpose) -> SigningKey {
        let mut bytes = Vec::with_capacity(self.0.len() + purpose.marker().len());
        bytes.extend_from_slice(self.0.as_bytes());
        bytes.extend_from_slice(purpose.marker().as_bytes());
        SigningKey(bytes)
    }
}

impl std::fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AppSecret(<redacted>)")
    }
}

/// HS256 key material for a single purpose. Built per call and dropped right after.
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.0)
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.0)
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;
    use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
    use serde_json::{json, Value};

    #[test]
    fn markers_are_distinct() {
        for (i, a) in TokenPurpose::ALL.iter().enumerate() {
            for b in TokenPurpose::ALL.iter().skip(i + 1) {
                assert_ne!(a.marker(), b.marker());
            }
        }
    }

    fn sign(key: &SigningKey) -> String {
        encode(&Header::default(), &json!({ "uid": 1 }), &key.encoding_key()).unwrap()
    }

    fn check(token: &str, key: &SigningKey) -> Result<(), ErrorKind> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        decode::<Value>(token, &key.decoding_key(), &validation)
            .map(|_| ())
            .map_err(|e| e.into_kind())
    }

    #[test]
    fn keys_differ_per_purpose() {
        let secret = AppSecret::new("secret");
        let auth = secret.signing_key(TokenPurpose::Authentication);
        let confirm = secret.signing_key(TokenPurpose::EmailConfirmation);

        let token = sign(&auth);
        assert!(check(&token, &auth).is_ok());
        assert!(matches!(
            check(&token, &confirm),
            Err(ErrorKind::InvalidSignature)
        ));
    }

    #[test]
    fn key_depends_on_secret() {
        let token = sign(&AppSecret::new("one").signing_key(TokenPurpose::Authentication));
        let other = AppSecret::new("two").signing_key(TokenPurpose::Authentication);
        assert!(matches!(
            check(&token, &other),
            Err(ErrorKind::InvalidSignature)
        ));
    }

    #[test]
    fn key_is_secret_followed_by_marker() {
        let token = sign(&AppSecret::new("s").signing_key(TokenPurpose::EmailConfirmation));
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        let key = DecodingKey::from_secret(b"s#email-confirmation");
        assert!(decode::<Value>(&token, &key, &validation).is_ok());
    }

    #[test]
    fn debug_redacts_secret() {
        let secret = AppSecret::new("hunter2");
        assert!(!format!("{secret:?}").contains("hunter2"));
    }
}
