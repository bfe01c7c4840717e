// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: registration, login and profile changes.
//!
//! Email ownership is proven by mailing a purpose-bound token: registration
//! mails an `EmailConfirmation` token to the new account, and an email change
//! mails an `EmailChangeConfirmation` token (carrying the new address) to the
//! address being claimed. Nothing changes until the token comes back.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    auth::{AuthError, AuthTokenPayload, ClaimSet, TokenPurpose, VerificationOutcome, EMAIL_CLAIM},
    error::ApiError,
    mail::Mail,
    models::{
        ConfirmRequest, DeleteUserRequest, LoginRequest, LoginResponse, RegisterRequest,
        UpdateEmailRequest, UpdatePasswordRequest, User, UserResponse,
    },
    password::{hash_password, verify_password},
    state::AppState,
    store::{NOTHING_TO_UPDATE, USER_DOES_NOT_EXIST},
};

pub const WRONG_PASSWORD: &str = "Wrong password";
pub const EMAIL_NOT_CONFIRMED: &str = "Email is not confirmed";
pub const INVALID_CONFIRMATION_TOKEN: &str = "Invalid confirmation token";
pub const CONFIRMATION_TOKEN_EXPIRED: &str = "Confirmation token expired";
const MAIL_FAILED: &str = "Failed to send confirmation email";

async fn check_password(user: &User, password: &str) -> Result<(), ApiError> {
    if verify_password(password, &user.password_hash).await? {
        Ok(())
    } else {
        Err(ApiError::bad_request(WRONG_PASSWORD))
    }
}

/// Verify a mailed confirmation token and return its claims.
fn confirmation_claims(
    state: &AppState,
    token: &str,
    purpose: TokenPurpose,
) -> Result<ClaimSet, ApiError> {
    match state.authenticator.verifier().verify(token, purpose) {
        VerificationOutcome::Valid(claims) => Ok(claims),
        VerificationOutcome::Expired => Err(ApiError::bad_request(CONFIRMATION_TOKEN_EXPIRED)),
        outcome @ (VerificationOutcome::Malformed | VerificationOutcome::SignatureInvalid) => {
            tracing::debug!(%purpose, ?outcome, "rejected confirmation token");
            Err(ApiError::bad_request(INVALID_CONFIRMATION_TOKEN))
        }
    }
}

fn send_mail(state: &AppState, mail: Mail) -> Result<(), ApiError> {
    state.mailer.send(mail).map_err(|e| {
        tracing::warn!(error = %e, "mail delivery failed");
        ApiError::internal(MAIL_FAILED)
    })
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    tag = "Users",
    responses(
        (status = 201, description = "User created, confirmation token mailed"),
        (status = 400, description = "Invalid input or email taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    let password_hash = hash_password(&request.password).await?;

    let mut store = state.store.write().await;
    let user = store.create_user(&request.email, password_hash)?;
    let token = state.issuer.email_confirmation_token(user.id)?;

    if let Err(err) = send_mail(&state, Mail::registration_confirmation(&user.email, &token)) {
        // Without the mail the account could never be confirmed.
        store.delete_user(user.id)?;
        return Err(err);
    }

    tracing::info!(user_id = user.id, "user registered");
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    post,
    path = "/register/confirm",
    request_body = ConfirmRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Registration confirmed"),
        (status = 400, description = "Invalid or expired token")
    )
)]
pub async fn confirm_registration(
    State(state): State<AppState>,
    Json(request): Json<ConfirmRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    let claims = confirmation_claims(&state, &request.token, TokenPurpose::EmailConfirmation)?;
    let user_id = claims
        .user_id()
        .map_err(|_| ApiError::bad_request(INVALID_CONFIRMATION_TOKEN))?;

    state.store.write().await.confirm_user(user_id)?;

    tracing::info!(user_id, "registration confirmed");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Authentication token", body = LoginResponse),
        (status = 400, description = "Unknown user, wrong password or unconfirmed email")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let user = state
        .store
        .read()
        .await
        .user_by_email(&request.email)
        .ok_or_else(|| ApiError::bad_request(USER_DOES_NOT_EXIST))?;
    check_password(&user, &request.password).await?;
    if !user.confirmed {
        return Err(ApiError::bad_request(EMAIL_NOT_CONFIRMED));
    }

    let token = state.issuer.authentication_token(user.id)?;
    tracing::info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse { token }))
}

#[utoipa::path(
    get,
    path = "/user",
    tag = "Users",
    security(("authentication_token" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 400, description = "User does not exist"),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn get_user(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.store.read().await.user(payload.user_id()?)?;
    Ok(Json(UserResponse { email: user.email }))
}

#[utoipa::path(
    delete,
    path = "/user",
    request_body = DeleteUserRequest,
    tag = "Users",
    security(("authentication_token" = [])),
    responses(
        (status = 200, description = "Account and its neural networks deleted"),
        (status = 400, description = "Wrong password"),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn delete_user(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
    Json(request): Json<DeleteUserRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    let user_id = payload.user_id()?;

    let user = state.store.read().await.user(user_id)?;
    check_password(&user, &request.password).await?;
    state.store.write().await.delete_user(user_id)?;

    tracing::info!(user_id, "user deleted");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    put,
    path = "/user/email",
    request_body = UpdateEmailRequest,
    tag = "Users",
    security(("authentication_token" = [])),
    responses(
        (status = 200, description = "Confirmation token mailed to the new address"),
        (status = 400, description = "Wrong password, email taken or unchanged"),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn update_email(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
    Json(request): Json<UpdateEmailRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    let user_id = payload.user_id()?;

    let user = state.store.read().await.user(user_id)?;
    check_password(&user, &request.password).await?;
    state
        .store
        .read()
        .await
        .ensure_email_available(user_id, &request.new_email)?;

    let token = state.issuer.email_change_token(user_id, &request.new_email)?;
    send_mail(
        &state,
        Mail::email_change_confirmation(&request.new_email, &token),
    )?;

    tracing::info!(user_id, "email change requested");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/user/email/confirm",
    request_body = ConfirmRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Email changed"),
        (status = 400, description = "Invalid or expired token, or email taken meanwhile")
    )
)]
pub async fn confirm_email_change(
    State(state): State<AppState>,
    Json(request): Json<ConfirmRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    let claims =
        confirmation_claims(&state, &request.token, TokenPurpose::EmailChangeConfirmation)?;
    let invalid = |_: AuthError| ApiError::bad_request(INVALID_CONFIRMATION_TOKEN);
    let user_id = claims.user_id().map_err(invalid)?;
    let new_email = claims.text(EMAIL_CLAIM).map_err(invalid)?;

    state.store.write().await.update_email(user_id, new_email)?;

    tracing::info!(user_id, "email changed");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    put,
    path = "/user/password",
    request_body = UpdatePasswordRequest,
    tag = "Users",
    security(("authentication_token" = [])),
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Wrong password or unchanged"),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn update_password(
    payload: AuthTokenPayload,
    State(state): State<AppState>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    let user_id = payload.user_id()?;
    if request.password == request.new_password {
        return Err(ApiError::bad_request(NOTHING_TO_UPDATE));
    }

    let user = state.store.read().await.user(user_id)?;
    check_password(&user, &request.password).await?;
    let password_hash = hash_password(&request.new_password).await?;
    state
        .store
        .write()
        .await
        .update_password_hash(user_id, password_hash)?;

    tracing::info!(user_id, "password changed");
    Ok(StatusCode::OK)
}
