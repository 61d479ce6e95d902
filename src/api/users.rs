// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User lookup and deletion endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        CheckUserRequest, CheckUserResponse, DeleteUserRequest, DeleteUserResponse, UserSummary,
    },
    state::AppState,
};

const USER_NOT_FOUND: &str = "No user found with this email address";

/// Look up a Privy user by email address.
///
/// Returns the user id and the first linked wallet, if any.
#[utoipa::path(
    post,
    path = "/api/check-user-by-email",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CheckUserRequest,
    responses(
        (status = 200, description = "User found", body = CheckUserResponse),
        (status = 400, description = "Missing email"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No user with this email", body = CheckUserResponse),
        (status = 500, description = "Privy lookup failed")
    )
)]
pub async fn check_user_by_email(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<CheckUserRequest>,
) -> Result<(StatusCode, Json<CheckUserResponse>), ApiError> {
    let email = request
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required field: email"))?;

    let privy = state.privy()?;
    let user = privy
        .find_user_by_email(&email)
        .await
        .map_err(|e| ApiError::from_privy(e, "Failed to query user by email", false))?;

    let Some(user) = user else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(CheckUserResponse {
                success: false,
                user: None,
                error: Some(USER_NOT_FOUND.to_string()),
            }),
        ));
    };

    Ok((
        StatusCode::OK,
        Json(CheckUserResponse {
            success: true,
            user: Some(UserSummary {
                id: user.id,
                email,
                wallet: user.wallet,
            }),
            error: None,
        }),
    ))
}

/// Delete a Privy user.
///
/// Privy's status code is relayed when it rejects the deletion.
#[utoipa::path(
    post,
    path = "/api/delete-user",
    tag = "Users",
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "User deleted", body = DeleteUserResponse),
        (status = 400, description = "Missing userId"),
        (status = 500, description = "Privy deletion failed")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Json(request): Json<DeleteUserRequest>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    let user_id = request
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required field: userId"))?;

    let privy = state.privy()?;
    privy
        .delete_user(&user_id)
        .await
        .map_err(|e| ApiError::from_privy(e, "Failed to delete user", true))?;

    Ok(Json(DeleteUserResponse {
        success: true,
        message: format!("User {user_id} deleted successfully"),
    }))
}
