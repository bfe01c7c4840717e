// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults and fixed limits. Configuration is
//! loaded from the environment once at startup and is read-only afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `APP_SECRET` | Secret all token signing keys derive from | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, time::Duration};

use thiserror::Error;

use crate::auth::AppSecret;

/// Environment variable holding the application secret.
///
/// Rotating it invalidates every token ever issued, of every purpose.
pub const APP_SECRET_ENV: &str = "APP_SECRET";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Lifetime of tokens returned by `POST /login`.
pub const AUTH_TOKEN_LIFETIME: Duration = Duration::from_secs(15 * 24 * 60 * 60);

/// Lifetime of registration and email-change confirmation tokens.
pub const CONFIRMATION_TOKEN_LIFETIME: Duration = Duration::from_secs(15 * 60);

pub const MIN_PASSWORD_LENGTH: u64 = 6;
pub const MAX_NN_NAME_LENGTH: u64 = 255;

/// Records per page on paginated listings.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set to a non-empty value")]
    MissingSecret(&'static str),

    #[error("invalid {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Startup configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub secret: AppSecret,
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(APP_SECRET_ENV)
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::MissingSecret(APP_SECRET_ENV))?;

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(port) => port.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: PORT_ENV,
                value: port,
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                name: HOST_ENV,
                value: host,
            })?;

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            secret: AppSecret::new(secret),
            bind_addr,
            log_format,
        })
    }
}
