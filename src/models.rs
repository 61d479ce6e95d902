// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the browser-facing API. Field names follow
//! what the wallet UI sends (`camelCase` requests) and what it reads back.
//!
//! Request fields are optional at the type level so that missing fields are
//! reported with a readable 400 rather than a deserialization rejection.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// =============================================================================
// User Models
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CheckUserRequest {
    /// Email address to look up.
    #[serde(default)]
    pub email: Option<String>,
}

/// A Privy user reduced to what the wallet UI needs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserSummary {
    /// Privy user id (`did:privy:…`).
    pub id: String,
    pub email: String,
    /// First linked account of type `wallet`, as returned by Privy.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub wallet: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CheckUserResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub message: String,
}

// =============================================================================
// Wallet Models
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportWalletRequest {
    #[serde(default)]
    pub wallet_id: Option<String>,
    /// Wallet address; required by the UI flow, not sent to Privy.
    #[serde(default)]
    pub address: Option<String>,
    /// Recipient HPKE public key (base64) generated in the browser.
    #[serde(default)]
    pub public_key: Option<String>,
}

/// HPKE-encrypted private key as returned by Privy.
///
/// Decryption happens in the browser; this service never sees the key.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct EncryptedWalletExport {
    pub encapsulated_key: String,
    pub ciphertext: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportWalletResponse {
    pub success: bool,
    pub encrypted_data: EncryptedWalletExport,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWalletPolicyRequest {
    #[serde(default)]
    pub wallet_id: Option<String>,
    /// Policy ids to attach; must be an array of strings.
    #[serde(default)]
    #[schema(value_type = Option<Vec<String>>)]
    pub policy_ids: Option<Value>,
    /// Absent: owner unchanged. `null`: owner cleared.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub owner_id: Option<Option<String>>,
}

/// Tells a present `null` (`Some(None)`) apart from a missing field (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UpdateWalletPolicyResponse {
    pub success: bool,
    /// Updated wallet as returned by Privy.
    #[schema(value_type = Object)]
    pub wallet: Value,
}
