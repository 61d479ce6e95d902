// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet export and policy endpoints.
//!
//! Both forward to Privy wallet APIs that require an authorization signature.
//! The exported key is HPKE-encrypted to a public key generated in the
//! browser and passes through this service still encrypted.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        ExportWalletRequest, ExportWalletResponse, UpdateWalletPolicyRequest,
        UpdateWalletPolicyResponse,
    },
    state::AppState,
};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Export a wallet's private key, encrypted to the caller's HPKE public key.
#[utoipa::path(
    post,
    path = "/api/export-wallet",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    request_body = ExportWalletRequest,
    responses(
        (status = 200, description = "Encrypted key material", body = ExportWalletResponse),
        (status = 400, description = "Missing walletId, address or publicKey"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Privy export failed")
    )
)]
pub async fn export_wallet(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<ExportWalletRequest>,
) -> Result<Json<ExportWalletResponse>, ApiError> {
    let (Some(wallet_id), Some(_address)) =
        (non_empty(request.wallet_id), non_empty(request.address))
    else {
        return Err(ApiError::bad_request(
            "Missing required fields: walletId and address are required",
        ));
    };
    let public_key = non_empty(request.public_key).ok_or_else(|| {
        ApiError::bad_request("Missing required field: publicKey is required for encryption")
    })?;

    let privy = state.privy()?;
    let encrypted_data = privy
        .export_wallet(&wallet_id, &public_key)
        .await
        .map_err(|e| ApiError::from_privy(e, "Failed to export wallet private key", false))?;

    tracing::info!(
        wallet_id = %wallet_id,
        user_id = caller.user_id.as_deref().unwrap_or("unverified"),
        "Wallet key exported"
    );

    Ok(Json(ExportWalletResponse {
        success: true,
        encrypted_data,
    }))
}

/// Replace a wallet's policies and optionally its owner.
///
/// `ownerId: null` clears the owner; omitting it leaves the owner as is.
/// Privy's status code is relayed when it rejects the update.
#[utoipa::path(
    post,
    path = "/api/update-wallet-policy",
    tag = "Wallets",
    request_body = UpdateWalletPolicyRequest,
    responses(
        (status = 200, description = "Updated wallet", body = UpdateWalletPolicyResponse),
        (status = 400, description = "Missing walletId or policyIds"),
        (status = 500, description = "Privy update failed")
    )
)]
pub async fn update_wallet_policy(
    State(state): State<AppState>,
    Json(request): Json<UpdateWalletPolicyRequest>,
) -> Result<Json<UpdateWalletPolicyResponse>, ApiError> {
    let missing = || {
        ApiError::bad_request("Missing required fields: walletId and policyIds (array) are required")
    };

    let wallet_id = non_empty(request.wallet_id).ok_or_else(missing)?;
    let policy_ids = match request.policy_ids {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(id) => Some(id),
                _ => None,
            })
            .collect::<Option<Vec<String>>>()
            .ok_or_else(missing)?,
        _ => return Err(missing()),
    };
    let owner_id = request.owner_id.as_ref().map(Option::as_deref);

    let privy = state.privy()?;
    let wallet = privy
        .update_wallet_policy(&wallet_id, &policy_ids, owner_id)
        .await
        .map_err(|e| ApiError::from_privy(e, "Failed to update wallet", true))?;

    Ok(Json(UpdateWalletPolicyResponse {
        success: true,
        wallet,
    }))
}
