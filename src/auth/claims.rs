// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and typed claim lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::AuthError;

/// Numeric user id carried by authentication and confirmation tokens.
pub const USER_ID_CLAIM: &str = "uid";

/// New email address carried by email-change tokens.
pub const EMAIL_CLAIM: &str = "email";

/// Expiry timestamp (milliseconds since epoch). Reserved by the codec.
pub const EXPIRY_CLAIM: &str = "exp";

/// A primitive claim value.
///
/// Payloads are flat: objects, arrays and `null` are not claim values and
/// make the whole payload malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Integer(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        ClaimValue::Float(value)
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::Text(value)
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::Text(value.to_string())
    }
}

/// Claims of a token, excluding its expiry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(BTreeMap<String, ClaimValue>);

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ClaimValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ClaimValue)> {
        self.0.iter()
    }

    /// Look up a claim by name.
    pub fn extract(&self, name: &str) -> Result<&ClaimValue, AuthError> {
        self.0
            .get(name)
            .ok_or_else(|| AuthError::ClaimMissing(name.to_string()))
    }

    /// Look up an integer claim. Any other type counts as missing.
    pub fn integer(&self, name: &str) -> Result<i64, AuthError> {
        match self.extract(name)? {
            ClaimValue::Integer(value) => Ok(*value),
            _ => Err(AuthError::ClaimMissing(name.to_string())),
        }
    }

    /// Look up a string claim. Any other type counts as missing.
    pub fn text(&self, name: &str) -> Result<&str, AuthError> {
        match self.extract(name)? {
            ClaimValue::Text(value) => Ok(value),
            _ => Err(AuthError::ClaimMissing(name.to_string())),
        }
    }

    /// The `uid` claim.
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.integer(USER_ID_CLAIM)
    }
}

/// Claims and expiry read back out of a token.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub claims: ClaimSet,
    /// Expiry in milliseconds since epoch, if the token carries one.
    pub expires_at: Option<i64>,
}
