// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    auth::AuthTokenPayload,
    error::ApiError,
    models::{
        CreateNeuralNetworkRequest, CreateNeuralNetworkResponse, NeuralNetwork,
        NeuralNetworkIdRequest, PublicNeuralNetwork, UpdateNeuralNetworkApiRootRequest,
        UpdateNeuralNetworkApiSecretRequest, UpdateNeuralNetworkNameRequest,
    },
    state::AppState,
    store::NewNeuralNetwork,
};

#[utoipa::path(
    get,
    path = "/nn/{page}",
    params(("page" = u32, Path, description = "1-based page number")),
    tag = "Neural Networks",
    responses(
        (status = 200, description = "Active networks, ordered by id", body = [PublicNeuralNetwork]),
        (status = 400, description = "Invalid page")
    )
)]
pub async fn list_active(
    State(state): State<AppState>,
    Path(page): Path<u32>,
) -> Result<Json<Vec<PublicNeuralNetwork>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.list_active_neural_networks(page)?))
}

#[utoipa::path(
    post,
    path = "/nn",
    request_body = CreateNeuralNetworkRequest,
    tag = "Neural Networks",
    security(("authentication_token" = [])),
    responses(
        (status = 201, body = CreateNeuralNetworkResponse),
        (status = 400, description = "Invalid input or name taken"),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn create(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
    Json(request): Json<CreateNeuralNetworkRequest>,
) -> Result<(StatusCode, Json<CreateNeuralNetworkResponse>), ApiError> {
    request.validate()?;
    let owner_id = payload.user_id()?;

    let nn = state.store.write().await.create_neural_network(
        owner_id,
        NewNeuralNetwork {
            name: request.name,
            api_root: request.api_root,
            api_secret: request.api_secret,
        },
    )?;

    tracing::info!(owner_id, nn_id = nn.id, "neural network created");
    Ok((
        StatusCode::CREATED,
        Json(CreateNeuralNetworkResponse { id: nn.id }),
    ))
}

#[utoipa::path(
    delete,
    path = "/nn",
    request_body = NeuralNetworkIdRequest,
    tag = "Neural Networks",
    security(("authentication_token" = [])),
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "No such network owned by the caller")
    )
)]
pub async fn delete(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
    Json(request): Json<NeuralNetworkIdRequest>,
) -> Result<StatusCode, ApiError> {
    let owner_id = payload.user_id()?;
    state
        .store
        .write()
        .await
        .delete_neural_network(owner_id, request.id)?;

    tracing::info!(owner_id, nn_id = request.id, "neural network deleted");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/user/nn/all/{page}",
    params(("page" = u32, Path, description = "1-based page number")),
    tag = "Neural Networks",
    security(("authentication_token" = [])),
    responses(
        (status = 200, description = "Caller's networks, ordered by id", body = [NeuralNetwork]),
        (status = 400, description = "Invalid page"),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn list_owned(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
    Path(page): Path<u32>,
) -> Result<Json<Vec<NeuralNetwork>>, ApiError> {
    let owner_id = payload.user_id()?;
    let store = state.store.read().await;
    Ok(Json(store.list_owned_neural_networks(owner_id, page)?))
}

#[utoipa::path(
    get,
    path = "/user/nn/{id}",
    params(("id" = i64, Path, description = "Network id")),
    tag = "Neural Networks",
    security(("authentication_token" = [])),
    responses(
        (status = 200, body = NeuralNetwork),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "No such network owned by the caller")
    )
)]
pub async fn get_owned(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<NeuralNetwork>, ApiError> {
    let owner_id = payload.user_id()?;
    let store = state.store.read().await;
    Ok(Json(store.owned_neural_network(owner_id, id)?))
}

#[utoipa::path(
    put,
    path = "/user/nn/name",
    request_body = UpdateNeuralNetworkNameRequest,
    tag = "Neural Networks",
    security(("authentication_token" = [])),
    responses(
        (status = 200, description = "Renamed"),
        (status = 400, description = "Invalid, unchanged or taken name"),
        (status = 404, description = "No such network owned by the caller")
    )
)]
pub async fn update_name(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
    Json(request): Json<UpdateNeuralNetworkNameRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    let owner_id = payload.user_id()?;
    state
        .store
        .write()
        .await
        .rename_neural_network(owner_id, request.id, &request.name)?;

    tracing::info!(owner_id, nn_id = request.id, "neural network renamed");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    put,
    path = "/user/nn/api_root",
    request_body = UpdateNeuralNetworkApiRootRequest,
    tag = "Neural Networks",
    security(("authentication_token" = [])),
    responses(
        (status = 200, description = "API root changed"),
        (status = 400, description = "Invalid or unchanged URL"),
        (status = 404, description = "No such network owned by the caller")
    )
)]
pub async fn update_api_root(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
    Json(request): Json<UpdateNeuralNetworkApiRootRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    let owner_id = payload.user_id()?;
    state
        .store
        .write()
        .await
        .update_api_root(owner_id, request.id, &request.api_root)?;

    tracing::info!(owner_id, nn_id = request.id, "neural network api root changed");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    put,
    path = "/user/nn/api_secret",
    request_body = UpdateNeuralNetworkApiSecretRequest,
    tag = "Neural Networks",
    security(("authentication_token" = [])),
    responses(
        (status = 200, description = "API secret changed"),
        (status = 400, description = "Blank or unchanged secret"),
        (status = 404, description = "No such network owned by the caller")
    )
)]
pub async fn update_api_secret(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
    Json(request): Json<UpdateNeuralNetworkApiSecretRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    let owner_id = payload.user_id()?;
    state
        .store
        .write()
        .await
        .update_api_secret(owner_id, request.id, &request.api_secret)?;

    tracing::info!(owner_id, nn_id = request.id, "neural network api secret changed");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    put,
    path = "/user/nn/toggle_activity",
    request_body = NeuralNetworkIdRequest,
    tag = "Neural Networks",
    security(("authentication_token" = [])),
    responses(
        (status = 200, description = "Activity flipped"),
        (status = 404, description = "No such network owned by the caller")
    )
)]
pub async fn toggle_activity(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
    Json(request): Json<NeuralNetworkIdRequest>,
) -> Result<StatusCode, ApiError> {
    let owner_id = payload.user_id()?;
    let active = state
        .store
        .write()
        .await
        .toggle_activity(owner_id, request.id)?;

    tracing::info!(owner_id, nn_id = request.id, active, "neural network activity toggled");
    Ok(StatusCode::OK)
}
