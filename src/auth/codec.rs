// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token wire format.
//!
//! Tokens are HS256 JWTs signed with the purpose key from
//! [`AppSecret::signing_key`]. The payload is a flat JSON object of primitive
//! claims plus an optional `exp` in milliseconds since epoch. Standard JWT
//! claim validation is off: expiry is checked by [`super::TokenVerifier`]
//! against milliseconds, and no registered claim is required.

use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::claims::{ClaimSet, ClaimValue, DecodedToken, EXPIRY_CLAIM};
use super::purpose::{AppSecret, TokenPurpose};

pub(crate) const ALGORITHM: Algorithm = Algorithm::HS256;

/// Errors from encoding or structurally decoding a token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token cannot be split, base64-decoded or parsed.
    #[error("token is malformed")]
    Malformed,

    /// The claim name is owned by the codec.
    #[error("claim '{0}' is reserved")]
    ReservedClaim(&'static str),

    /// NaN and infinities have no JSON representation.
    #[error("claim '{0}' is not a finite number")]
    NonFiniteClaim(String),

    #[error("failed to serialize token: {0}")]
    Serialization(String),
}

#[derive(Serialize)]
struct PayloadRef<'a> {
    #[serde(flatten)]
    claims: &'a ClaimSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct Payload {
    #[serde(flatten)]
    claims: ClaimSet,
    #[serde(default)]
    exp: Option<i64>,
}

impl From<Payload> for DecodedToken {
    fn from(payload: Payload) -> Self {
        DecodedToken {
            claims: payload.claims,
            expires_at: payload.exp,
        }
    }
}

/// HS256 validation with the registered-claim checks switched off.
pub(crate) fn validation() -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

/// Builds and parses signed tokens.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    secret: AppSecret,
}

impl TokenCodec {
    pub fn new(secret: AppSecret) -> Self {
        Self { secret }
    }

    /// Serialize `claims` and `expires_at` and sign them for `purpose`.
    ///
    /// Deterministic: the same inputs under the same secret always produce
    /// the same token.
    pub fn encode(
        &self,
        purpose: TokenPurpose,
        claims: &ClaimSet,
        expires_at: Option<i64>,
    ) -> Result<String, TokenError> {
        if claims.contains(EXPIRY_CLAIM) {
            return Err(TokenError::ReservedClaim(EXPIRY_CLAIM));
        }
        if let Some((name, _)) = claims
            .iter()
            .find(|(_, value)| matches!(value, ClaimValue::Float(f) if !f.is_finite()))
        {
            return Err(TokenError::NonFiniteClaim(name.clone()));
        }

        let payload = PayloadRef {
            claims,
            exp: expires_at,
        };
        jsonwebtoken::encode(
            &Header::new(ALGORITHM),
            &payload,
            &self.secret.signing_key(purpose).encoding_key(),
        )
        .map_err(|e| TokenError::Serialization(e.to_string()))
    }

    /// Read claims and expiry without checking the signature.
    ///
    /// Never use the result for a trust decision on its own; run
    /// [`super::TokenVerifier::verify`] first.
    pub fn decode(token: &str) -> Result<DecodedToken, TokenError> {
        let mut validation = validation();
        validation.insecure_disable_signature_validation();

        let data = jsonwebtoken::decode::<Payload>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|_| TokenError::Malformed)?;
        // Algorithms are only matched against the header when signatures are checked.
        if data.header.alg != ALGORITHM {
            return Err(TokenError::Malformed);
        }
        Ok(data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64ct::{Base64UrlUnpadded, Encoding};
    use crate::auth::claims::{EMAIL_CLAIM, USER_ID_CLAIM};

    fn codec() -> TokenCodec {
        TokenCodec::new(AppSecret::new("test-secret"))
    }

    #[test]
    fn round_trip_preserves_claims_and_expiry() {
        let claims = ClaimSet::new()
            .with(USER_ID_CLAIM, 42_i64)
            .with(EMAIL_CLAIM, "a@b.c")
            .with("admin", false)
            .with("score", 0.25_f64);

        for purpose in TokenPurpose::ALL {
            for expires_at in [None, Some(1_700_000_000_123)] {
                let token = codec().encode(purpose, &claims, expires_at).unwrap();
                let decoded = TokenCodec::decode(&token).unwrap();
                assert_eq!(decoded.claims, claims);
                assert_eq!(decoded.expires_at, expires_at);
            }
        }
    }

    #[test]
    fn empty_claim_set_round_trips() {
        let token = codec()
            .encode(TokenPurpose::Authentication, &ClaimSet::new(), None)
            .unwrap();
        let decoded = TokenCodec::decode(&token).unwrap();
        assert!(decoded.claims.is_empty());
        assert_eq!(decoded.expires_at, None);
    }

    #[test]
    fn encoding_is_deterministic() {
        let claims = ClaimSet::new().with(USER_ID_CLAIM, 1_i64);
        let a = codec()
            .encode(TokenPurpose::Authentication, &claims, Some(10))
            .unwrap();
        let b = codec()
            .encode(TokenPurpose::Authentication, &claims, Some(10))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn token_has_three_url_safe_segments() {
        let token = codec()
            .encode(
                TokenPurpose::Authentication,
                &ClaimSet::new().with(USER_ID_CLAIM, 7_i64),
                Some(1),
            )
            .unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn reserved_expiry_claim_is_rejected() {
        let claims = ClaimSet::new().with(EXPIRY_CLAIM, 5_i64);
        assert_eq!(
            codec().encode(TokenPurpose::Authentication, &claims, None),
            Err(TokenError::ReservedClaim(EXPIRY_CLAIM))
        );
    }

    #[test]
    fn non_finite_claim_is_rejected() {
        let claims = ClaimSet::new().with("score", f64::NAN);
        assert_eq!(
            codec().encode(TokenPurpose::Authentication, &claims, None),
            Err(TokenError::NonFiniteClaim("score".to_string()))
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        let inputs = [
            "",
            ".",
            "..",
            "a.b.c",
            "a.b.c.d",
            "not a token",
            "\u{0}\u{1}.\u{2}.\u{3}",
        ];
        for input in inputs {
            assert_eq!(TokenCodec::decode(input), Err(TokenError::Malformed), "{input:?}");
        }
    }

    #[test]
    fn decode_rejects_non_object_payload() {
        let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
        for payload in [&b"[1,2]"[..], b"42", b"{\"uid\":{\"x\":1}}", b"{\"exp\":\"soon\"}"] {
            let token = format!("{header}.{}.sig", Base64UrlUnpadded::encode_string(payload));
            assert_eq!(TokenCodec::decode(&token), Err(TokenError::Malformed));
        }
    }

    #[test]
    fn decode_rejects_other_algorithms() {
        let header = Base64UrlUnpadded::encode_string(br#"{"alg":"none"}"#);
        let payload = Base64UrlUnpadded::encode_string(br#"{"uid":1}"#);
        let token = format!("{header}.{payload}.");
        assert_eq!(TokenCodec::decode(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn decode_accepts_foreign_well_formed_tokens() {
        // Structure only: the signature is not looked at.
        let header = Base64UrlUnpadded::encode_string(br#"{"typ":"JWT","alg":"HS256"}"#);
        let payload = Base64UrlUnpadded::encode_string(br#"{"uid":1,"exp":1650510736}"#);
        let token = format!("{header}.{payload}.not-a-signature");

        let decoded = TokenCodec::decode(&token).unwrap();
        assert_eq!(decoded.claims.user_id(), Ok(1));
        assert_eq!(decoded.expires_at, Some(1_650_510_736));
    }
}
