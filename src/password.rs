// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification using Argon2id.
//!
//! Argon2 hashing is CPU-bound; both operations run on tokio's blocking
//! pool instead of the async workers.

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use tokio::task::{self, JoinError};

use crate::error::ApiError;

/// Hash a password into a PHC string for storage.
pub async fn hash_password(password: &str) -> Result<String, ApiError> {
    let password = password.to_owned();
    task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(worker_failed)?
}

/// Whether `password` matches the stored PHC string.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let (password, hash) = (password.to_owned(), hash.to_owned());
    task::spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .map_err(worker_failed)
}

fn hash_blocking(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(rand::thread_rng());

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            ApiError::internal("Failed to hash password")
        })
}

fn verify_blocking(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "stored password hash is not a PHC string");
            false
        }
    }
}

fn worker_failed(err: JoinError) -> ApiError {
    tracing::error!(error = %err, "password worker failed");
    ApiError::internal("Failed to check password")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn hash_and_verify() {
        let hash = hash_password("Qwerty123").await.unwrap();
        assert!(verify_password("Qwerty123", &hash).await.unwrap());
        assert!(!verify_password("123123", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        assert_ne!(
            hash_password("Qwerty123").await.unwrap(),
            hash_password("Qwerty123").await.unwrap()
        );
    }

    #[tokio::test]
    async fn garbage_hash_never_verifies() {
        assert!(!verify_password("Qwerty123", "not-a-hash").await.unwrap());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_leaves_the_runtime_free() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });

        // On a single-threaded runtime the spawned task only runs if hashing
        // yields instead of occupying the thread.
        let hash = hash_password("Qwerty123").await.unwrap();
        assert!(ran.load(Ordering::SeqCst));

        ran.store(false, Ordering::SeqCst);
        let flag = ran.clone();
        tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });
        assert!(verify_password("Qwerty123", &hash).await.unwrap());
        assert!(ran.load(Ordering::SeqCst));
    }
}
