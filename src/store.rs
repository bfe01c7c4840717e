// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store for users and their neural networks.
//!
//! Records live in `BTreeMap`s keyed by id, so iteration order is id order
//! and pagination needs no extra sorting. Ids are assigned sequentially from 1.

use std::collections::BTreeMap;

use crate::config::PAGE_SIZE;
use crate::error::ApiError;
use crate::models::{NeuralNetwork, PublicNeuralNetwork, User};

pub const USER_DOES_NOT_EXIST: &str = "User does not exist";
pub const USER_ALREADY_CONFIRMED: &str = "User is already confirmed";
pub const EMAIL_IS_TAKEN: &str = "Email is already taken";
pub const NOTHING_TO_UPDATE: &str = "Nothing to update";
pub const NN_DOES_NOT_EXIST: &str = "Neural network does not exist";
pub const NN_NAME_IS_TAKEN: &str = "Neural network name is already taken";
pub const INVALID_PAGE: &str = "Page number must be at least 1";

/// Fields of a network at creation time.
#[derive(Debug, Clone)]
pub struct NewNeuralNetwork {
    pub name: String,
    pub api_root: String,
    pub api_secret: String,
}

#[derive(Default)]
pub struct InMemoryStore {
    users: BTreeMap<i64, User>,
    neural_networks: BTreeMap<i64, NeuralNetwork>,
    last_user_id: i64,
    last_nn_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert an unconfirmed user.
    pub fn create_user(&mut self, email: &str, password_hash: String) -> Result<User, ApiError> {
        if self.user_by_email(email).is_some() {
            return Err(ApiError::bad_request(EMAIL_IS_TAKEN));
        }

        self.last_user_id += 1;
        let user = User {
            id: self.last_user_id,
            email: email.to_string(),
            password_hash,
            confirmed: false,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn confirm_user(&mut self, user_id: i64) -> Result<(), ApiError> {
        let user = self.user_mut(user_id)?;
        if user.confirmed {
            return Err(ApiError::bad_request(USER_ALREADY_CONFIRMED));
        }
        user.confirmed = true;
        Ok(())
    }

    pub fn user(&self, user_id: i64) -> Result<User, ApiError> {
        self.users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ApiError::bad_request(USER_DOES_NOT_EXIST))
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users.values().find(|user| user.email == email).cloned()
    }

    /// Fails when the address is unchanged or belongs to another user.
    pub fn ensure_email_available(&self, user_id: i64, email: &str) -> Result<(), ApiError> {
        match self.user_by_email(email) {
            Some(owner) if owner.id == user_id => Err(ApiError::bad_request(NOTHING_TO_UPDATE)),
            Some(_) => Err(ApiError::bad_request(EMAIL_IS_TAKEN)),
            None => Ok(()),
        }
    }

    pub fn update_email(&mut self, user_id: i64, email: &str) -> Result<(), ApiError> {
        self.user(user_id)?;
        self.ensure_email_available(user_id, email)?;
        self.user_mut(user_id)?.email = email.to_string();
        Ok(())
    }

    pub fn update_password_hash(
        &mut self,
        user_id: i64,
        password_hash: String,
    ) -> Result<(), ApiError> {
        self.user_mut(user_id)?.password_hash = password_hash;
        Ok(())
    }

    /// Remove a user together with every network they own.
    pub fn delete_user(&mut self, user_id: i64) -> Result<(), ApiError> {
        if self.users.remove(&user_id).is_none() {
            return Err(ApiError::bad_request(USER_DOES_NOT_EXIST));
        }
        self.neural_networks.retain(|_, nn| nn.owner_id != user_id);
        Ok(())
    }

    fn user_mut(&mut self, user_id: i64) -> Result<&mut User, ApiError> {
        self.users
            .get_mut(&user_id)
            .ok_or_else(|| ApiError::bad_request(USER_DOES_NOT_EXIST))
    }

    // =========================================================================
    // Neural networks
    // =========================================================================

    /// Insert an inactive network. Names are unique per owner.
    pub fn create_neural_network(
        &mut self,
        owner_id: i64,
        new: NewNeuralNetwork,
    ) -> Result<NeuralNetwork, ApiError> {
        self.user(owner_id)?;
        self.ensure_name_available(owner_id, &new.name)?;

        self.last_nn_id += 1;
        let nn = NeuralNetwork {
            id: self.last_nn_id,
            owner_id,
            name: new.name,
            api_root: new.api_root,
            api_secret: new.api_secret,
            active: false,
        };
        self.neural_networks.insert(nn.id, nn.clone());
        Ok(nn)
    }

    /// A network owned by `owner_id`. Someone else's network is reported as missing.
    pub fn owned_neural_network(&self, owner_id: i64, id: i64) -> Result<NeuralNetwork, ApiError> {
        self.neural_networks
            .get(&id)
            .filter(|nn| nn.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(NN_DOES_NOT_EXIST))
    }

    pub fn list_owned_neural_networks(
        &self,
        owner_id: i64,
        page: u32,
    ) -> Result<Vec<NeuralNetwork>, ApiError> {
        let skip = page_offset(page)?;
        Ok(self
            .neural_networks
            .values()
            .filter(|nn| nn.owner_id == owner_id)
            .skip(skip)
            .take(PAGE_SIZE)
            .cloned()
            .collect())
    }

    pub fn list_active_neural_networks(
        &self,
        page: u32,
    ) -> Result<Vec<PublicNeuralNetwork>, ApiError> {
        let skip = page_offset(page)?;
        Ok(self
            .neural_networks
            .values()
            .filter(|nn| nn.active)
            .skip(skip)
            .take(PAGE_SIZE)
            .map(PublicNeuralNetwork::from)
            .collect())
    }

    pub fn rename_neural_network(
        &mut self,
        owner_id: i64,
        id: i64,
        name: &str,
    ) -> Result<(), ApiError> {
        let current = self.owned_neural_network(owner_id, id)?;
        if current.name == name {
            return Err(ApiError::bad_request(NOTHING_TO_UPDATE));
        }
        self.ensure_name_available(owner_id, name)?;
        self.owned_mut(owner_id, id)?.name = name.to_string();
        Ok(())
    }

    pub fn update_api_root(&mut self, owner_id: i64, id: i64, api_root: &str) -> Result<(), ApiError> {
        let nn = self.owned_mut(owner_id, id)?;
        if nn.api_root == api_root {
            return Err(ApiError::bad_request(NOTHING_TO_UPDATE));
        }
        nn.api_root = api_root.to_string();
        Ok(())
    }

    pub fn update_api_secret(
        &mut self,
        owner_id: i64,
        id: i64,
        api_secret: &str,
    ) -> Result<(), ApiError> {
        let nn = self.owned_mut(owner_id, id)?;
        if nn.api_secret == api_secret {
            return Err(ApiError::bad_request(NOTHING_TO_UPDATE));
        }
        nn.api_secret = api_secret.to_string();
        Ok(())
    }

    /// Flip `active` and return the new value.
    pub fn toggle_activity(&mut self, owner_id: i64, id: i64) -> Result<bool, ApiError> {
        let nn = self.owned_mut(owner_id, id)?;
        nn.active = !nn.active;
        Ok(nn.active)
    }

    pub fn delete_neural_network(&mut self, owner_id: i64, id: i64) -> Result<(), ApiError> {
        self.owned_neural_network(owner_id, id)?;
        self.neural_networks.remove(&id);
        Ok(())
    }

    fn ensure_name_available(&self, owner_id: i64, name: &str) -> Result<(), ApiError> {
        let taken = self
            .neural_networks
            .values()
            .any(|nn| nn.owner_id == owner_id && nn.name == name);
        if taken {
            Err(ApiError::bad_request(NN_NAME_IS_TAKEN))
        } else {
            Ok(())
        }
    }

    fn owned_mut(&mut self, owner_id: i64, id: i64) -> Result<&mut NeuralNetwork, ApiError> {
        self.neural_networks
            .get_mut(&id)
            .filter(|nn| nn.owner_id == owner_id)
            .ok_or_else(|| ApiError::not_found(NN_DOES_NOT_EXIST))
    }
}

/// Records to skip for a 1-based page number.
fn page_offset(page: u32) -> Result<usize, ApiError> {
    if page == 0 {
        return Err(ApiError::bad_request(INVALID_PAGE));
    }
    Ok((page as usize - 1) * PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    fn network(name: &str) -> NewNeuralNetwork {
        NewNeuralNetwork {
            name: name.to_string(),
            api_root: "https://nn.example.com/api".to_string(),
            api_secret: "s3cret".to_string(),
        }
    }

    fn store_with_user() -> (InMemoryStore, i64) {
        let mut store = InMemoryStore::new();
        let user = store.create_user("user@example.com", "hash".into()).unwrap();
        (store, user.id)
    }

    #[test]
    fn users_get_sequential_ids_and_start_unconfirmed() {
        let mut store = InMemoryStore::new();
        let first = store.create_user("a@example.com", "h".into()).unwrap();
        let second = store.create_user("b@example.com", "h".into()).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(!first.confirmed);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (mut store, _) = store_with_user();
        let err = store.create_user("user@example.com", "h".into()).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, EMAIL_IS_TAKEN);
    }

    #[test]
    fn confirm_only_once() {
        let (mut store, id) = store_with_user();
        store.confirm_user(id).unwrap();
        assert!(store.user(id).unwrap().confirmed);
        assert_eq!(store.confirm_user(id).unwrap_err().message, USER_ALREADY_CONFIRMED);
        assert_eq!(store.confirm_user(99).unwrap_err().message, USER_DOES_NOT_EXIST);
    }

    #[test]
    fn email_update_rules() {
        let (mut store, id) = store_with_user();
        store.create_user("other@example.com", "h".into()).unwrap();

        assert_eq!(
            store.update_email(id, "user@example.com").unwrap_err().message,
            NOTHING_TO_UPDATE
        );
        assert_eq!(
            store.update_email(id, "other@example.com").unwrap_err().message,
            EMAIL_IS_TAKEN
        );

        store.update_email(id, "new@example.com").unwrap();
        assert_eq!(store.user(id).unwrap().email, "new@example.com");
        assert!(store.user_by_email("user@example.com").is_none());
    }

    #[test]
    fn deleting_user_removes_their_networks() {
        let (mut store, id) = store_with_user();
        let other = store.create_user("other@example.com", "h".into()).unwrap().id;
        let mine = store.create_neural_network(id, network("mine")).unwrap();
        let theirs = store.create_neural_network(other, network("theirs")).unwrap();

        store.delete_user(id).unwrap();

        assert!(store.user(id).is_err());
        assert!(store.owned_neural_network(id, mine.id).is_err());
        assert!(store.owned_neural_network(other, theirs.id).is_ok());
    }

    #[test]
    fn network_names_are_unique_per_owner() {
        let (mut store, id) = store_with_user();
        let other = store.create_user("other@example.com", "h".into()).unwrap().id;

        store.create_neural_network(id, network("nn")).unwrap();
        assert_eq!(
            store.create_neural_network(id, network("nn")).unwrap_err().message,
            NN_NAME_IS_TAKEN
        );
        assert!(store.create_neural_network(other, network("nn")).is_ok());
    }

    #[test]
    fn foreign_networks_look_missing() {
        let (mut store, id) = store_with_user();
        let other = store.create_user("other@example.com", "h".into()).unwrap().id;
        let nn = store.create_neural_network(id, network("nn")).unwrap();

        let err = store.owned_neural_network(other, nn.id).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(
            store.delete_neural_network(other, nn.id).unwrap_err().status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            store.toggle_activity(other, nn.id).unwrap_err().status,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn updates_reject_unchanged_values() {
        let (mut store, id) = store_with_user();
        let nn = store.create_neural_network(id, network("nn")).unwrap();

        assert_eq!(
            store.rename_neural_network(id, nn.id, "nn").unwrap_err().message,
            NOTHING_TO_UPDATE
        );
        assert_eq!(
            store
                .update_api_root(id, nn.id, "https://nn.example.com/api")
                .unwrap_err()
                .message,
            NOTHING_TO_UPDATE
        );
        assert_eq!(
            store.update_api_secret(id, nn.id, "s3cret").unwrap_err().message,
            NOTHING_TO_UPDATE
        );

        store.rename_neural_network(id, nn.id, "renamed").unwrap();
        store.update_api_root(id, nn.id, "https://other.example.com").unwrap();
        store.update_api_secret(id, nn.id, "rotated").unwrap();

        let updated = store.owned_neural_network(id, nn.id).unwrap();
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.api_root, "https://other.example.com");
        assert_eq!(updated.api_secret, "rotated");
    }

    #[test]
    fn public_listing_shows_only_active_networks() {
        let (mut store, id) = store_with_user();
        let hidden = store.create_neural_network(id, network("hidden")).unwrap();
        let shown = store.create_neural_network(id, network("shown")).unwrap();
        assert!(!hidden.active);

        assert!(store.toggle_activity(id, shown.id).unwrap());

        let page = store.list_active_neural_networks(1).unwrap();
        assert_eq!(page, vec![PublicNeuralNetwork::from(&store.owned_neural_network(id, shown.id).unwrap())]);

        assert!(!store.toggle_activity(id, shown.id).unwrap());
        assert!(store.list_active_neural_networks(1).unwrap().is_empty());
    }

    #[test]
    fn pagination_is_one_based_and_ordered_by_id() {
        let (mut store, id) = store_with_user();
        for i in 0..(PAGE_SIZE + 3) {
            store.create_neural_network(id, network(&format!("nn-{i}"))).unwrap();
        }

        let first = store.list_owned_neural_networks(id, 1).unwrap();
        let second = store.list_owned_neural_networks(id, 2).unwrap();
        let third = store.list_owned_neural_networks(id, 3).unwrap();

        assert_eq!(first.len(), PAGE_SIZE);
        assert_eq!(second.len(), 3);
        assert!(third.is_empty());
        assert_eq!(first[0].name, "nn-0");
        assert_eq!(second[0].id, first[PAGE_SIZE - 1].id + 1);

        assert_eq!(
            store.list_owned_neural_networks(id, 0).unwrap_err().message,
            INVALID_PAGE
        );
        assert!(store.list_active_neural_networks(0).is_err());
    }
}
