// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization key loading.
//!
//! The Privy dashboard hands out the authorization key as base64 PKCS#8 DER,
//! optionally prefixed with `wallet-auth:`. The key is wrapped in PEM
//! delimiters, parsed, and decoded into a P-256 signing key.

use p256::{ecdsa::SigningKey, pkcs8::DecodePrivateKey, SecretKey};

use super::SignerError;

/// Prefix the Privy dashboard puts in front of exported authorization keys.
pub const WALLET_AUTH_PREFIX: &str = "wallet-auth:";

const PEM_LABEL: &str = "PRIVATE KEY";
const SEC1_PEM_LABEL: &str = "EC PRIVATE KEY";

/// A parsed, ready-to-use authorization key.
///
/// Immutable once loaded. `Debug` never prints key material.
#[derive(Clone)]
pub struct SigningKeyHandle {
    key: SigningKey,
}

impl SigningKeyHandle {
    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }

    /// SEC1 compressed public key, handy for matching against the key
    /// registered in the Privy dashboard.
    pub fn public_key_sec1(&self) -> Vec<u8> {
        self.key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }
}

impl std::fmt::Debug for SigningKeyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyHandle")
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Wrap raw base64 key material in PKCS#8 PEM delimiters.
///
/// Input that is already PEM (possibly with `\n` escaped, as single-line env
/// values usually are) is returned with real newlines.
pub fn wrap_pem(raw: &str) -> String {
    let trimmed = raw.trim();
    let material = trimmed.strip_prefix(WALLET_AUTH_PREFIX).unwrap_or(trimmed);
    if material.starts_with("-----BEGIN") {
        return material.replace("\\n", "\n");
    }
    format!("-----BEGIN {PEM_LABEL}-----\n{material}\n-----END {PEM_LABEL}-----")
}

/// Load an authorization key from its configured string form.
///
/// # Errors
/// [`SignerError::Configuration`] when the value is empty, is not valid PEM
/// or base64, or does not hold a P-256 private key. No signing is attempted
/// with a key that failed to load.
pub fn load_signing_key(raw: &str) -> Result<SigningKeyHandle, SignerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == WALLET_AUTH_PREFIX {
        return Err(SignerError::Configuration(
            "authorization key is empty".to_string(),
        ));
    }

    let pem = pem::parse(wrap_pem(trimmed))
        .map_err(|e| SignerError::Configuration(format!("invalid PEM: {e}")))?;

    let secret_key = match pem.tag() {
        PEM_LABEL => SecretKey::from_pkcs8_der(pem.contents())
            .map_err(|e| SignerError::Configuration(format!("invalid PKCS#8 key: {e}")))?,
        SEC1_PEM_LABEL => SecretKey::from_sec1_der(pem.contents())
            .map_err(|e| SignerError::Configuration(format!("invalid SEC1 key: {e}")))?,
        other => {
            return Err(SignerError::Configuration(format!(
                "unexpected PEM label: {other}"
            )))
        }
    };

    Ok(SigningKeyHandle {
        key: SigningKey::from(secret_key),
    })
}
