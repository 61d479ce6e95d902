// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Rejections of the Privy access token.
//!
//! A missing or non-bearer header answers a bare `Unauthorized`; the browser
//! has nothing to fix but logging in. Token failures name the check that
//! failed so an expired session can be told apart from a foreign token.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`.
    #[error("Unauthorized")]
    InvalidAuthHeader,
    #[error("Access token is not a valid JWT")]
    MalformedToken,
    /// Not signed by the configured Privy verification key.
    #[error("Access token was not issued for this app")]
    InvalidSignature,
    #[error("Access token has expired")]
    TokenExpired,
    /// `iss` is not `privy.io`.
    #[error("Access token was not issued by Privy")]
    InvalidIssuer,
    /// `aud` is not this app id.
    #[error("Access token is for another Privy app")]
    InvalidAudience,
    #[error("Access token is not valid yet")]
    TokenNotYetValid,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: &'static str,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code(),
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
