// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::providers::privy::PrivyError;

pub const MISCONFIGURED_MESSAGE: &str = "Server misconfiguration: Missing Privy credentials";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn misconfigured() -> Self {
        Self::internal(MISCONFIGURED_MESSAGE)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Map a failed Privy call to a response.
    ///
    /// With `relay_status`, an upstream rejection keeps Privy's status code;
    /// otherwise every failure is a 500. Signer and configuration failures
    /// are always 500 and never reach Privy. A path parameter that cannot be
    /// addressed is the caller's fault: 400.
    pub fn from_privy(err: PrivyError, message: &str, relay_status: bool) -> Self {
        if let PrivyError::InvalidPathParameter(_) = err {
            warn!(error = %err, "{message}");
            return Self::bad_request(err.to_string());
        }
        error!(error = %err, "{message}");
        match err {
            PrivyError::MissingConfig(_) | PrivyError::InvalidConfig(_) => Self::misconfigured(),
            PrivyError::Upstream { status, body } => {
                let status = if relay_status {
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                Self::new(status, message).with_details(body)
            }
            other => Self::internal(message).with_details(Value::String(other.to_string())),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::SignerError;
    use axum::body::to_bytes;
    use serde_json::json;

    #[test]
    fn constructors_set_status_and_message() {
        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");

        let internal = ApiError::misconfigured();
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.message, MISCONFIGURED_MESSAGE);
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }

    #[test]
    fn upstream_status_is_relayed_only_when_asked() {
        let upstream = || PrivyError::Upstream {
            status: 404,
            body: json!({"error": "not found"}),
        };

        let relayed = ApiError::from_privy(upstream(), "Failed to delete user", true);
        assert_eq!(relayed.status, StatusCode::NOT_FOUND);
        assert_eq!(relayed.details, Some(json!({"error": "not found"})));

        let masked = ApiError::from_privy(upstream(), "Failed to export", false);
        assert_eq!(masked.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unaddressable_path_parameter_is_a_bad_request() {
        let err = PrivyError::InvalidPathParameter("..".into());
        let api = ApiError::from_privy(err, "Failed to delete user", true);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, r#"Invalid path parameter: "..""#);
    }

    #[test]
    fn signer_failures_are_internal_errors() {
        let err = PrivyError::Signer(SignerError::Canonicalization("not an object".into()));
        let api = ApiError::from_privy(err, "Failed to update wallet", true);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Failed to update wallet");
    }
}
