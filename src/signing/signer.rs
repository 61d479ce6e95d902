// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request signer used for every outbound Privy API call.

use base64ct::{Base64, Encoding};
use p256::ecdsa::{signature::Signer, Signature};
use reqwest::Method;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{load_signing_key, SignablePayload, SignerError, SigningKeyHandle};

/// Produces `privy-authorization-signature` header values.
///
/// Holds the parsed authorization key and the app id. Both are immutable, so
/// a single signer can be shared across requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    app_id: String,
    key: SigningKeyHandle,
}

impl RequestSigner {
    pub fn new(app_id: impl Into<String>, key: SigningKeyHandle) -> Result<Self, SignerError> {
        let app_id = app_id.into();
        if app_id.trim().is_empty() {
            return Err(SignerError::Configuration("app id is empty".to_string()));
        }
        Ok(Self { app_id, key })
    }

    /// Build a signer from the configured app id and raw authorization key.
    ///
    /// # Errors
    /// [`SignerError::Configuration`] if either value is missing or the key
    /// does not parse.
    pub fn from_config(app_id: &str, raw_key: &str) -> Result<Self, SignerError> {
        if app_id.trim().is_empty() {
            return Err(SignerError::Configuration("app id is empty".to_string()));
        }
        let key = load_signing_key(raw_key)?;
        Self::new(app_id.trim(), key)
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn key(&self) -> &SigningKeyHandle {
        &self.key
    }

    /// Sign a request and return the base64 header value.
    ///
    /// `url` must be exactly the URL the HTTP client sends and `body` exactly
    /// the JSON object it transmits (`{}` for bodiless requests). `method`
    /// must be the method actually used; a DELETE signed as POST is rejected
    /// by Privy.
    pub fn sign<B: Serialize + ?Sized>(
        &self,
        method: &Method,
        url: &str,
        body: &B,
    ) -> Result<String, SignerError> {
        let payload = SignablePayload::new(method.as_str(), url, body, &self.app_id)?;
        self.sign_payload(&payload)
    }

    /// Sign a `POST` request.
    pub fn sign_post<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<String, SignerError> {
        self.sign(&Method::POST, url, body)
    }

    /// Sign an already assembled payload.
    pub fn sign_payload(&self, payload: &SignablePayload) -> Result<String, SignerError> {
        let canonical = payload.canonical_bytes()?;

        let signature: Signature = self
            .key
            .signing_key()
            .try_sign(&canonical)
            .map_err(|e| SignerError::Signing(e.to_string()))?;

        debug!(
            method = %payload.method,
            url = %payload.url,
            digest = %format!("sha256:{:x}", Sha256::digest(&canonical)),
            "Signed Privy request"
        );

        Ok(Base64::encode_string(signature.to_der().as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::{key::tests::TEST_AUTHORIZATION_KEY, verify_signature};
    use p256::ecdsa::{signature::Verifier, VerifyingKey};
    use serde_json::json;

    const USER_URL: &str = "https://auth.example.io/api/v1/users/abc123";

    fn signer() -> RequestSigner {
        RequestSigner::from_config("app_1", TEST_AUTHORIZATION_KEY).expect("signer builds")
    }

    fn verifying_key(signer: &RequestSigner) -> VerifyingKey {
        signer.key().signing_key().verifying_key().clone()
    }

    #[test]
    fn delete_signature_verifies_against_canonical_form() {
        let signer = signer();
        let signature = signer.sign(&Method::DELETE, USER_URL, &json!({})).unwrap();

        let canonical = br#"{"body":{},"headers":{"privy-app-id":"app_1"},"method":"DELETE","url":"https://auth.example.io/api/v1/users/abc123","version":1}"#;
        let der = Base64::decode_vec(&signature).unwrap();
        let parsed = Signature::from_der(&der).unwrap();
        assert!(verifying_key(&signer).verify(canonical, &parsed).is_ok());
    }

    #[test]
    fn every_signature_verifies() {
        let signer = signer();
        let body = json!({"encryption_type": "HPKE", "recipient_public_key": "BASE64KEY"});
        let url = "https://auth.example.io/v1/wallets/w1/export";
        let payload = SignablePayload::new("POST", url, &body, "app_1").unwrap();

        for _ in 0..3 {
            let signature = signer.sign_post(url, &body).unwrap();
            assert!(verify_signature(&verifying_key(&signer), &payload, &signature).unwrap());
        }
    }

    #[test]
    fn body_key_order_does_not_change_signature() {
        let signer = signer();
        let url = "https://auth.example.io/v1/wallets/w1";

        let mut first = serde_json::Map::new();
        first.insert("policy_ids".into(), json!(["p1", "p2"]));
        first.insert("owner_id".into(), json!("owner"));
        let mut second = serde_json::Map::new();
        second.insert("owner_id".into(), json!("owner"));
        second.insert("policy_ids".into(), json!(["p1", "p2"]));

        let a = SignablePayload::new("PATCH", url, &first, "app_1").unwrap();
        let b = SignablePayload::new("PATCH", url, &second, "app_1").unwrap();
        assert_eq!(a.canonical_bytes().unwrap(), b.canonical_bytes().unwrap());

        let signature = signer.sign(&Method::PATCH, url, &first).unwrap();
        assert!(verify_signature(&verifying_key(&signer), &b, &signature).unwrap());
    }

    #[test]
    fn post_and_patch_signatures_do_not_cross_verify() {
        let signer = signer();
        let url = "https://auth.example.io/v1/wallets/w1";
        let body = json!({"policy_ids": ["p1"]});

        let post_sig = signer.sign(&Method::POST, url, &body).unwrap();
        let patch_sig = signer.sign(&Method::PATCH, url, &body).unwrap();

        let post_payload = SignablePayload::new("POST", url, &body, "app_1").unwrap();
        let patch_payload = SignablePayload::new("PATCH", url, &body, "app_1").unwrap();
        let key = verifying_key(&signer);

        assert!(verify_signature(&key, &post_payload, &post_sig).unwrap());
        assert!(verify_signature(&key, &patch_payload, &patch_sig).unwrap());
        assert!(!verify_signature(&key, &post_payload, &patch_sig).unwrap());
        assert!(!verify_signature(&key, &patch_payload, &post_sig).unwrap());
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let signer = signer();
        let body = json!({"type": "email", "address": "a@example.com"});
        let url = "https://auth.example.io/api/v1/users/email/address";
        let signature = signer.sign_post(url, &body).unwrap();
        let key = verifying_key(&signer);

        let original = SignablePayload::new("POST", url, &body, "app_1").unwrap();
        assert!(verify_signature(&key, &original, &signature).unwrap());

        let mut other_url = original.clone();
        other_url.url = "https://auth.example.io/api/v1/users/email/addresses".into();
        assert!(!verify_signature(&key, &other_url, &signature).unwrap());

        let mut other_body = original.clone();
        other_body.body["address"] = json!("b@example.com");
        assert!(!verify_signature(&key, &other_body, &signature).unwrap());

        let mut other_method = original.clone();
        other_method.method = "PUT".into();
        assert!(!verify_signature(&key, &other_method, &signature).unwrap());

        let mut other_app = original;
        other_app.headers.privy_app_id = "app_2".into();
        assert!(!verify_signature(&key, &other_app, &signature).unwrap());
    }

    #[test]
    fn number_and_string_are_not_interchangeable() {
        let signer = signer();
        let url = "https://auth.example.io/v1/wallets/w1";
        let signature = signer.sign_post(url, &json!({"amount": 1})).unwrap();

        let as_string = SignablePayload::new("POST", url, &json!({"amount": "1"}), "app_1").unwrap();
        assert!(!verify_signature(&verifying_key(&signer), &as_string, &signature).unwrap());
    }

    #[test]
    fn missing_key_or_app_id_is_a_configuration_error() {
        let err = RequestSigner::from_config("app_1", "").unwrap_err();
        assert!(matches!(err, SignerError::Configuration(_)));

        let err = RequestSigner::from_config("", TEST_AUTHORIZATION_KEY).unwrap_err();
        assert!(matches!(err, SignerError::Configuration(_)));
    }

    #[test]
    fn string_body_is_rejected_before_signing() {
        let signer = signer();
        let err = signer
            .sign_post("https://x", &json!({"a": 1}).to_string())
            .unwrap_err();
        assert!(matches!(err, SignerError::Canonicalization(_)));
    }
}
