// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Neurotriumph Server - Neural Network Registry API
//!
//! Users register, confirm their email and log in for a bearer token; with it
//! they manage neural network records that are listed publicly once active.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Purpose-bound JWTs and per-route authentication
//! - `store` - In-memory users and neural networks
//! - `mail` - Outbound confirmation mail

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod mail;
pub mod models;
pub mod password;
pub mod state;
pub mod store;
