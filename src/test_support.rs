// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared test fixtures: a recording stand-in for the Privy API and helpers
//! to check what it received.

use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    Json, Router,
};
use base64ct::{Base64, Encoding};
use serde_json::Value;

use crate::{
    config::PrivyConfig,
    signing::{
        key::tests::TEST_AUTHORIZATION_KEY, load_signing_key, verify_signature, SignablePayload,
        SIGNATURE_HEADER,
    },
};

pub const TEST_APP_ID: &str = "app_1";
pub const TEST_APP_SECRET: &str = "secret_1";

pub fn test_privy_config(base_url: &str) -> PrivyConfig {
    PrivyConfig {
        api_base_url: base_url.to_string(),
        app_id: Some(TEST_APP_ID.to_string()),
        app_secret: Some(TEST_APP_SECRET.to_string()),
        authorization_key: Some(TEST_AUTHORIZATION_KEY.to_string()),
        verification_key: None,
    }
}

pub fn basic_auth_value() -> String {
    format!(
        "Basic {}",
        Base64::encode_string(format!("{TEST_APP_ID}:{TEST_APP_SECRET}").as_bytes())
    )
}

/// One request as seen by the fake upstream.
#[derive(Debug, Clone)]
pub struct CapturedCall {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when the request had none.
    pub body: Value,
}

impl CapturedCall {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

#[derive(Clone)]
struct UpstreamState {
    calls: Arc<Mutex<Vec<CapturedCall>>>,
    status: StatusCode,
    reply: Value,
}

pub struct FakeUpstream {
    pub base_url: String,
    calls: Arc<Mutex<Vec<CapturedCall>>>,
}

impl FakeUpstream {
    pub fn calls(&self) -> Vec<CapturedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn single_call(&self) -> CapturedCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one upstream call");
        calls.into_iter().next().unwrap()
    }
}

async fn record(
    State(state): State<UpstreamState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    state.calls.lock().unwrap().push(CapturedCall {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers,
        body,
    });
    (state.status, Json(state.reply.clone()))
}

/// Serve every request on an ephemeral port with a fixed reply.
pub async fn spawn_upstream(status: StatusCode, reply: Value) -> FakeUpstream {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(record).with_state(UpstreamState {
        calls: calls.clone(),
        status,
        reply,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeUpstream {
        base_url: format!("http://{addr}"),
        calls,
    }
}

/// Rebuild the signed document from a captured call and check its signature
/// against the test key, as Privy would.
pub fn verify_captured(base_url: &str, call: &CapturedCall) {
    let signature = call
        .header(SIGNATURE_HEADER)
        .expect("signature header present");
    let body = match &call.body {
        Value::Null => serde_json::json!({}),
        other => other.clone(),
    };
    let url = format!("{base_url}{}", call.path);
    let payload = SignablePayload::new(&call.method, &url, &body, TEST_APP_ID).unwrap();

    let key = load_signing_key(TEST_AUTHORIZATION_KEY).unwrap();
    let verifying_key = key.signing_key().verifying_key().clone();
    assert!(
        verify_signature(&verifying_key, &payload, &signature).unwrap(),
        "signature does not verify for {} {url}",
        call.method
    );
}
