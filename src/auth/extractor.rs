// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the caller's Privy access token.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(caller): Auth) -> impl IntoResponse {
//!     // caller.user_id is set when the token was verified
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use super::AuthError;
use crate::state::AppState;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Issuer of Privy access tokens.
pub const PRIVY_ISSUER: &str = "privy.io";

/// Access token verification settings.
///
/// - **Verified mode** (`PRIVY_VERIFICATION_KEY` set): ES256 signature,
///   issuer `privy.io`, audience = app id, expiry.
/// - **Development mode**: only the presence of a bearer token is checked.
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub decoding_key: Option<DecodingKey>,
    pub audience: Option<String>,
}

impl AuthConfig {
    /// Build from the PEM verification key shown in the Privy dashboard.
    pub fn from_pem(
        pem: Option<&str>,
        app_id: Option<&str>,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let decoding_key = pem
            .map(|pem| DecodingKey::from_ec_pem(pem.as_bytes()))
            .transpose()?;
        Ok(Self {
            decoding_key,
            audience: app_id.map(str::to_string),
        })
    }

    pub fn is_verifying(&self) -> bool {
        self.decoding_key.is_some()
    }
}

/// Caller identity derived from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Privy user id (`sub`), only known in verified mode.
    pub user_id: Option<String>,
    /// Privy session id (`sid`).
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccessTokenClaims {
    sub: String,
    #[serde(default)]
    sid: Option<String>,
}

/// Extractor requiring `Authorization: Bearer <token>`.
pub struct Auth(pub Caller);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidAuthHeader)?;

        let caller = verify_token(token, &state.auth_config)?;
        Ok(Auth(caller))
    }
}

fn verify_token(token: &str, auth_config: &AuthConfig) -> Result<Caller, AuthError> {
    let Some(decoding_key) = &auth_config.decoding_key else {
        return Ok(Caller {
            user_id: None,
            session_id: None,
        });
    };

    let mut validation = Validation::new(Algorithm::ES256);
    validation.leeway = CLOCK_SKEW_LEEWAY;
    validation.set_issuer(&[PRIVY_ISSUER]);
    match &auth_config.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<AccessTokenClaims>(token, decoding_key, &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
            _ => AuthError::MalformedToken,
        })?;

    Ok(Caller {
        user_id: Some(token_data.claims.sub),
        session_id: token_data.claims.sid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::{key::tests::TEST_AUTHORIZATION_KEY, key::wrap_pem, load_signing_key};
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use p256::pkcs8::{EncodePublicKey, LineEnding};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        sid: &'a str,
        iss: &'a str,
        aud: &'a str,
        iat: u64,
        exp: u64,
    }

    fn now() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    fn verifying_config() -> AuthConfig {
        let key = load_signing_key(TEST_AUTHORIZATION_KEY).unwrap();
        let public_pem = key
            .signing_key()
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap();
        AuthConfig::from_pem(Some(&public_pem), Some("app_1")).unwrap()
    }

    fn token(iss: &str, aud: &str, exp: u64) -> String {
        let private_pem = wrap_pem(TEST_AUTHORIZATION_KEY);
        let key = EncodingKey::from_ec_pem(private_pem.as_bytes()).unwrap();
        let claims = TestClaims {
            sub: "did:privy:user",
            sid: "sess_1",
            iss,
            aud,
            iat: now(),
            exp,
        };
        encode(&Header::new(Algorithm::ES256), &claims, &key).unwrap()
    }

    fn state_with(auth_config: AuthConfig) -> AppState {
        AppState::default().with_auth_config(auth_config)
    }

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = AppState::default();
        let mut parts = parts_with(None);
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_non_bearer_scheme() {
        let state = AppState::default();
        for header in ["Basic abc", "Bearer ", "bearer abc"] {
            let mut parts = parts_with(Some(header));
            let result = Auth::from_request_parts(&mut parts, &state).await;
            assert!(matches!(result, Err(AuthError::InvalidAuthHeader)), "{header}");
        }
    }

    #[tokio::test]
    async fn development_mode_accepts_any_bearer_token() {
        let state = AppState::default();
        let mut parts = parts_with(Some("Bearer opaque-token"));
        let Auth(caller) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(caller.user_id, None);
    }

    #[tokio::test]
    async fn verified_mode_accepts_valid_token() {
        let state = state_with(verifying_config());
        let token = token(PRIVY_ISSUER, "app_1", now() + 3600);
        let mut parts = parts_with(Some(&format!("Bearer {token}")));

        let Auth(caller) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(caller.user_id.as_deref(), Some("did:privy:user"));
        assert_eq!(caller.session_id.as_deref(), Some("sess_1"));
    }

    #[test]
    fn verified_mode_rejects_bad_tokens() {
        let config = verifying_config();

        let expired = token(PRIVY_ISSUER, "app_1", now() - 3600);
        assert_eq!(verify_token(&expired, &config), Err(AuthError::TokenExpired));

        let wrong_issuer = token("evil.io", "app_1", now() + 3600);
        assert_eq!(verify_token(&wrong_issuer, &config), Err(AuthError::InvalidIssuer));

        let wrong_audience = token(PRIVY_ISSUER, "app_2", now() + 3600);
        assert_eq!(verify_token(&wrong_audience, &config), Err(AuthError::InvalidAudience));

        assert_eq!(verify_token("not-a-jwt", &config), Err(AuthError::MalformedToken));
    }
}
