// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{HandlerCapability, IdentityRoute, MarkerError, SecuredRoutes, AUTH_TOKEN_HEADER},
    models::{
        ConfirmRequest, CreateNeuralNetworkRequest, CreateNeuralNetworkResponse,
        DeleteUserRequest, LoginRequest, LoginResponse, NeuralNetwork, NeuralNetworkIdRequest,
        PublicNeuralNetwork, RegisterRequest, UpdateEmailRequest,
        UpdateNeuralNetworkApiRootRequest, UpdateNeuralNetworkApiSecretRequest,
        UpdateNeuralNetworkNameRequest, UpdatePasswordRequest, UserResponse,
    },
    state::AppState,
};

pub mod health;
pub mod neural_networks;
pub mod users;

/// Build the application router.
///
/// Fails if a route's capability is misconfigured.
pub fn router(state: AppState) -> Result<Router, MarkerError> {
    let public = HandlerCapability::public();

    let routes = SecuredRoutes::<AppState>::new(state.authenticator.clone())
        .route("/health", public, get(health::health))?
        // Accounts
        .route("/register", public, post(users::register))?
        .route("/register/confirm", public, post(users::confirm_registration))?
        .route("/login", public, post(users::login))?
        .identity_route(
            "/user",
            IdentityRoute::new()
                .get(users::get_user)
                .delete(users::delete_user),
        )?
        .identity_route("/user/email", IdentityRoute::new().put(users::update_email))?
        .route(
            "/user/email/confirm",
            public,
            post(users::confirm_email_change),
        )?
        .identity_route(
            "/user/password",
            IdentityRoute::new().put(users::update_password),
        )?
        // Neural networks
        .route("/nn/{page}", public, get(neural_networks::list_active))?
        .identity_route(
            "/nn",
            IdentityRoute::new()
                .post(neural_networks::create)
                .delete(neural_networks::delete),
        )?
        .identity_route(
            "/user/nn/all/{page}",
            IdentityRoute::new().get(neural_networks::list_owned),
        )?
        .identity_route(
            "/user/nn/{id}",
            IdentityRoute::new().get(neural_networks::get_owned),
        )?
        .identity_route(
            "/user/nn/name",
            IdentityRoute::new().put(neural_networks::update_name),
        )?
        .identity_route(
            "/user/nn/api_root",
            IdentityRoute::new().put(neural_networks::update_api_root),
        )?
        .identity_route(
            "/user/nn/api_secret",
            IdentityRoute::new().put(neural_networks::update_api_secret),
        )?
        .identity_route(
            "/user/nn/toggle_activity",
            IdentityRoute::new().put(neural_networks::toggle_activity),
        )?
        .into_router()
        .with_state(state);

    Ok(Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive()))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        users::register,
        users::confirm_registration,
        users::login,
        users::get_user,
        users::delete_user,
        users::update_email,
        users::confirm_email_change,
        users::update_password,
        neural_networks::list_active,
        neural_networks::create,
        neural_networks::delete,
        neural_networks::list_owned,
        neural_networks::get_owned,
        neural_networks::update_name,
        neural_networks::update_api_root,
        neural_networks::update_api_secret,
        neural_networks::toggle_activity
    ),
    components(
        schemas(
            health::HealthResponse,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ConfirmRequest,
            UserResponse,
            UpdateEmailRequest,
            UpdatePasswordRequest,
            DeleteUserRequest,
            NeuralNetwork,
            PublicNeuralNetwork,
            CreateNeuralNetworkRequest,
            CreateNeuralNetworkResponse,
            NeuralNetworkIdRequest,
            UpdateNeuralNetworkNameRequest,
            UpdateNeuralNetworkApiRootRequest,
            UpdateNeuralNetworkApiSecretRequest
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Users", description = "Accounts and email confirmation"),
        (name = "Neural Networks", description = "Neural network registry")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "authentication_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(AUTH_TOKEN_HEADER))),
            )
        }
    }
}
