// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{AppSecret, RequestAuthenticator, TokenIssuer};
use crate::mail::Mailer;
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub authenticator: Arc<RequestAuthenticator>,
    pub issuer: Arc<TokenIssuer>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(secret: AppSecret, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            store: Arc::new(RwLock::new(InMemoryStore::new())),
            authenticator: Arc::new(RequestAuthenticator::new(secret.clone())),
            issuer: Arc::new(TokenIssuer::new(secret)),
            mailer,
        }
    }
}
