// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::Serialize;
use serde_json::Value;

use super::{canonical::canonicalize, SignerError};

/// Version of the Privy authorization signature format.
pub const SIGNATURE_VERSION: u32 = 1;

/// Headers Privy includes in the signed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedHeaders {
    #[serde(rename = "privy-app-id")]
    pub privy_app_id: String,
}

/// The document an authorization signature covers.
///
/// Field order here is irrelevant: [`SignablePayload::canonical_bytes`]
/// sorts keys before signing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignablePayload {
    pub version: u32,
    pub method: String,
    pub url: String,
    pub body: Value,
    pub headers: SignedHeaders,
}

impl SignablePayload {
    /// Build the payload for an outbound request.
    ///
    /// The body must serialize to a JSON object. Bodiless requests (DELETE)
    /// sign `{}`.
    pub fn new<B: Serialize + ?Sized>(
        method: &str,
        url: &str,
        body: &B,
        app_id: &str,
    ) -> Result<Self, SignerError> {
        let body = serde_json::to_value(body)
            .map_err(|e| SignerError::Canonicalization(e.to_string()))?;
        if !body.is_object() {
            return Err(SignerError::Canonicalization(format!(
                "request body must be a JSON object, got {}",
                json_kind(&body)
            )));
        }

        Ok(Self {
            version: SIGNATURE_VERSION,
            method: method.to_ascii_uppercase(),
            url: url.to_string(),
            body,
            headers: SignedHeaders {
                privy_app_id: app_id.to_string(),
            },
        })
    }

    /// JCS bytes of this payload.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, SignerError> {
        let value = serde_json::to_value(self)
            .map_err(|e| SignerError::Canonicalization(e.to_string()))?;
        Ok(canonicalize(&value))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
