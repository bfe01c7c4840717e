// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Request bodies derive
//! `Validate`; handlers run `validate()` before touching the store, so the
//! messages below are what clients see on a `400`.
//!
//! ## Model Categories
//!
//! - **Accounts**: registration, login, profile, email and password changes
//! - **Neural Networks**: records owned by a user, exposing an API root

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::config::{MAX_NN_NAME_LENGTH, MIN_PASSWORD_LENGTH};

// `#[validate]` only takes literal messages; the tests below hold each
// attribute to its constant.
pub const EMAIL_CANNOT_BE_BLANK: &str = "Email cannot be blank";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const PASSWORD_IS_TOO_SHORT: &str = "Password is too short";
pub const INVALID_NAME_LENGTH: &str = "Name must be 1 to 255 characters";
pub const INVALID_API_ROOT: &str = "Invalid API root";
pub const API_SECRET_CANNOT_BE_BLANK: &str = "API secret cannot be blank";
pub const TOKEN_CANNOT_BE_BLANK: &str = "Token cannot be blank";

// =============================================================================
// Account Models
// =============================================================================

/// A registered account. Never serialized; [`UserResponse`] is the public view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub confirmed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, message = "Email cannot be blank"),
        email(message = "Invalid email")
    )]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password is too short"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email cannot be blank"))]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password is too short"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Token for the `authentication-token` header.
    pub token: String,
}

/// Body of the confirmation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct ConfirmRequest {
    #[validate(length(min = 1, message = "Token cannot be blank"))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateEmailRequest {
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password is too short"))]
    pub password: String,
    #[validate(
        length(min = 1, message = "Email cannot be blank"),
        email(message = "Invalid email")
    )]
    pub new_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password is too short"))]
    pub password: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password is too short"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct DeleteUserRequest {
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password is too short"))]
    pub password: String,
}

// =============================================================================
// Neural Network Models
// =============================================================================

/// A neural network record as stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NeuralNetwork {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    /// Base URL the network's API is served from.
    pub api_root: String,
    /// Shared secret presented to the network's API. Only shown to the owner.
    pub api_secret: String,
    pub active: bool,
}

/// Public listing entry; omits the owner's secret.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PublicNeuralNetwork {
    pub id: i64,
    pub name: String,
    pub api_root: String,
}

impl From<&NeuralNetwork> for PublicNeuralNetwork {
    fn from(nn: &NeuralNetwork) -> Self {
        Self {
            id: nn.id,
            name: nn.name.clone(),
            api_root: nn.api_root.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateNeuralNetworkRequest {
    #[validate(length(min = 1, max = MAX_NN_NAME_LENGTH, message = "Name must be 1 to 255 characters"))]
    pub name: String,
    #[validate(url(message = "Invalid API root"))]
    pub api_root: String,
    #[validate(length(min = 1, message = "API secret cannot be blank"))]
    pub api_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CreateNeuralNetworkResponse {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NeuralNetworkIdRequest {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateNeuralNetworkNameRequest {
    pub id: i64,
    #[validate(length(min = 1, max = MAX_NN_NAME_LENGTH, message = "Name must be 1 to 255 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateNeuralNetworkApiRootRequest {
    pub id: i64,
    #[validate(url(message = "Invalid API root"))]
    pub api_root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateNeuralNetworkApiSecretRequest {
    pub id: i64,
    #[validate(length(min = 1, message = "API secret cannot be blank"))]
    pub api_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn message(result: Result<(), validator::ValidationErrors>) -> String {
        ApiError::from(result.unwrap_err()).message
    }

    #[test]
    fn register_request_validation() {
        let valid = RegisterRequest {
            email: "user@example.com".into(),
            password: "Qwerty123".into(),
        };
        assert!(valid.validate().is_ok());

        let blank = RegisterRequest {
            email: "".into(),
            ..valid.clone()
        };
        assert_eq!(message(blank.validate()), EMAIL_CANNOT_BE_BLANK);

        let invalid = RegisterRequest {
            email: "abc".into(),
            ..valid.clone()
        };
        assert_eq!(message(invalid.validate()), INVALID_EMAIL);

        let short = RegisterRequest {
            password: "a".repeat(MIN_PASSWORD_LENGTH as usize - 1),
            ..valid
        };
        assert_eq!(message(short.validate()), PASSWORD_IS_TOO_SHORT);
    }

    #[test]
    fn neural_network_name_limits() {
        let request = CreateNeuralNetworkRequest {
            name: "a".repeat(MAX_NN_NAME_LENGTH as usize),
            api_root: "https://nn.example.com/api".into(),
            api_secret: "s3cret".into(),
        };
        assert!(request.validate().is_ok());

        let too_long = CreateNeuralNetworkRequest {
            name: "a".repeat(MAX_NN_NAME_LENGTH as usize + 1),
            ..request.clone()
        };
        assert_eq!(message(too_long.validate()), INVALID_NAME_LENGTH);

        let bad_root = CreateNeuralNetworkRequest {
            api_root: "not a url".into(),
            ..request
        };
        assert_eq!(message(bad_root.validate()), INVALID_API_ROOT);
    }

    #[test]
    fn password_minimum_follows_config() {
        let at_minimum = UpdatePasswordRequest {
            password: "a".repeat(MIN_PASSWORD_LENGTH as usize),
            new_password: "b".repeat(MIN_PASSWORD_LENGTH as usize),
        };
        assert!(at_minimum.validate().is_ok());

        let short = DeleteUserRequest {
            password: "a".repeat(MIN_PASSWORD_LENGTH as usize - 1),
        };
        assert_eq!(message(short.validate()), PASSWORD_IS_TOO_SHORT);
    }

    #[test]
    fn blank_fields_report_their_constant() {
        let login = LoginRequest {
            email: "".into(),
            password: "Qwerty123".into(),
        };
        assert_eq!(message(login.validate()), EMAIL_CANNOT_BE_BLANK);

        let confirm = ConfirmRequest { token: "".into() };
        assert_eq!(message(confirm.validate()), TOKEN_CANNOT_BE_BLANK);

        let secret = UpdateNeuralNetworkApiSecretRequest {
            id: 1,
            api_secret: "".into(),
        };
        assert_eq!(message(secret.validate()), API_SECRET_CANNOT_BE_BLANK);

        let name = UpdateNeuralNetworkNameRequest {
            id: 1,
            name: "".into(),
        };
        assert_eq!(message(name.validate()), INVALID_NAME_LENGTH);
    }

    #[test]
    fn public_view_hides_secret() {
        let nn = NeuralNetwork {
            id: 1,
            owner_id: 2,
            name: "n".into(),
            api_root: "https://x".into(),
            api_secret: "s".into(),
            active: true,
        };
        let public = PublicNeuralNetwork::from(&nn);
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("api_secret"));
    }
}
