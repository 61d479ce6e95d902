// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Privy wallet API client.
//!
//! Every call is authenticated three ways: HTTP Basic auth with the app id
//! and secret, the `privy-app-id` header, and a `privy-authorization-signature`
//! over the exact method, URL and body being sent.

use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client, Method};
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use url::Url;

use crate::{
    config::{PrivyConfig, PRIVY_APP_ID_ENV, PRIVY_APP_SECRET_ENV, PRIVY_AUTHORIZATION_KEY_ENV},
    models::EncryptedWalletExport,
    signing::{RequestSigner, SignerError, APP_ID_HEADER, SIGNATURE_HEADER},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const EXPORT_ENCRYPTION_TYPE: &str = "HPKE";

#[derive(Debug, thiserror::Error)]
pub enum PrivyError {
    #[error("Privy configuration missing: {0}")]
    MissingConfig(String),

    #[error("Privy configuration invalid: {0}")]
    InvalidConfig(String),

    #[error("Invalid path parameter: {0:?}")]
    InvalidPathParameter(String),

    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error("Privy request failed: {0}")]
    Request(String),

    #[error("Privy returned {status}")]
    Upstream { status: u16, body: Value },

    #[error("Privy response was invalid: {0}")]
    InvalidResponse(String),
}

/// A user found by email lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PrivyUser {
    pub id: String,
    /// First linked account of type `wallet`.
    pub wallet: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct PrivyClient {
    api_base_url: Url,
    app_secret: String,
    signer: RequestSigner,
    http: Client,
}

impl PrivyClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Fails on missing credentials, an unparsable base URL, or an
    /// authorization key that does not load. No request is ever sent with a
    /// client that failed to build.
    pub fn from_config(config: &PrivyConfig) -> Result<Self, PrivyError> {
        let app_id = required(config.app_id.as_deref(), PRIVY_APP_ID_ENV)?;
        let app_secret = required(config.app_secret.as_deref(), PRIVY_APP_SECRET_ENV)?;
        let raw_key = required(
            config.authorization_key.as_deref(),
            PRIVY_AUTHORIZATION_KEY_ENV,
        )?;

        let api_base_url = Url::parse(&config.api_base_url)
            .map_err(|e| PrivyError::InvalidConfig(format!("invalid API base URL: {e}")))?;
        if api_base_url.cannot_be_a_base() {
            return Err(PrivyError::InvalidConfig(format!(
                "API base URL cannot carry a path: {api_base_url}"
            )));
        }

        let signer = RequestSigner::from_config(&app_id, &raw_key)?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PrivyError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_base_url,
            app_secret,
            signer,
            http,
        })
    }

    /// Look up a user by email address. `Ok(None)` when Privy knows no
    /// such user.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<PrivyUser>, PrivyError> {
        let url = self.endpoint(&["api", "v1", "users", "email", "address"])?;
        let body = json!({
            "type": "email",
            "address": email,
        });

        match self.signed_json(Method::POST, url, Some(&body)).await {
            Ok(response) => Ok(parse_user(&response)),
            Err(PrivyError::Upstream { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a user. The request carries no body; `{}` is signed.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), PrivyError> {
        let url = self.endpoint(&["api", "v1", "users", user_id])?;
        self.signed_json(Method::DELETE, url, None).await?;
        info!(user_id = %user_id, "Privy user deleted");
        Ok(())
    }

    /// Export a wallet's private key, HPKE-encrypted to `recipient_public_key`.
    pub async fn export_wallet(
        &self,
        wallet_id: &str,
        recipient_public_key: &str,
    ) -> Result<EncryptedWalletExport, PrivyError> {
        let url = self.endpoint(&["v1", "wallets", wallet_id, "export"])?;
        let body = json!({
            "encryption_type": EXPORT_ENCRYPTION_TYPE,
            "recipient_public_key": recipient_public_key,
        });

        let response = self.signed_json(Method::POST, url, Some(&body)).await?;
        parse_export(&response)
    }

    /// Replace the policies (and optionally the owner) of a wallet.
    ///
    /// `owner_id`: `None` leaves the owner untouched (field omitted),
    /// `Some(None)` sends `"owner_id": null` to clear it.
    pub async fn update_wallet_policy(
        &self,
        wallet_id: &str,
        policy_ids: &[String],
        owner_id: Option<Option<&str>>,
    ) -> Result<Value, PrivyError> {
        let url = self.endpoint(&["v1", "wallets", wallet_id])?;

        let mut body = Map::new();
        body.insert("policy_ids".to_string(), json!(policy_ids));
        if let Some(owner_id) = owner_id {
            body.insert("owner_id".to_string(), json!(owner_id));
        }
        let body = Value::Object(body);

        self.signed_json(Method::PATCH, url, Some(&body)).await
    }

    /// Absolute URL under the API base, with each segment percent-encoded.
    ///
    /// `.` and `..` are refused: the URL parser would resolve them away and
    /// the signed request would target another endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PrivyError> {
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(PrivyError::InvalidPathParameter(dot.to_string()));
        }
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PrivyError::InvalidConfig("API base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sign and send a request, returning the parsed JSON response.
    ///
    /// `body: None` sends no body and signs `{}`.
    async fn signed_json(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, PrivyError> {
        let empty = Value::Object(Map::new());
        let signature = self.signer.sign(&method, url.as_str(), body.unwrap_or(&empty))?;

        let path = url.path().to_string();
        let mut request = self
            .http
            .request(method.clone(), url)
            .basic_auth(self.signer.app_id(), Some(&self.app_secret))
            .header(APP_ID_HEADER, self.signer.app_id())
            .header(SIGNATURE_HEADER, signature)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PrivyError::Request(format!("{method} {path} failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PrivyError::Request(format!("{method} {path} body read failed: {e}")))?;

        if !status.is_success() {
            warn!(method = %method, path = %path, status = status.as_u16(), "Privy request rejected");
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(PrivyError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            PrivyError::InvalidResponse(format!("{method} {path} invalid JSON: {e}"))
        })
    }
}

fn required(value: Option<&str>, name: &str) -> Result<String, PrivyError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PrivyError::MissingConfig(name.to_string()))
}

fn parse_user(response: &Value) -> Option<PrivyUser> {
    let id = response.get("id").and_then(Value::as_str)?.to_string();
    let wallet = response
        .get("linked_accounts")
        .and_then(Value::as_array)
        .and_then(|accounts| {
            accounts
                .iter()
                .find(|account| account.get("type").and_then(Value::as_str) == Some("wallet"))
        })
        .cloned();
    Some(PrivyUser { id, wallet })
}

fn parse_export(response: &Value) -> Result<EncryptedWalletExport, PrivyError> {
    let field = |name: &str| {
        response
            .get(name)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                PrivyError::InvalidResponse(format!("export response missing {name}"))
            })
    };
    Ok(EncryptedWalletExport {
        encapsulated_key: field("encapsulated_key")?,
        ciphertext: field("ciphertext")?,
    })
}
