// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into [`AppConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `PRIVY_APP_ID` | Privy application id | Required for Privy calls |
//! | `PRIVY_APP_SECRET` | Privy app secret (Basic auth) | Required for Privy calls |
//! | `PRIVY_AUTHORIZATION_KEY` | P-256 authorization key (base64 PKCS#8, optional `wallet-auth:` prefix) | Required for Privy calls |
//! | `PRIVY_API_BASE_URL` | Privy API origin | `https://auth.privy.io` |
//! | `PRIVY_VERIFICATION_KEY` | ES256 public key (PEM) for access tokens | Optional |
//! | `TLS_CERT_PATH` | PEM certificate chain for HTTPS | Optional |
//! | `TLS_KEY_PATH` | PEM private key for HTTPS | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const PRIVY_APP_ID_ENV: &str = "PRIVY_APP_ID";
pub const PRIVY_APP_SECRET_ENV: &str = "PRIVY_APP_SECRET";

/// The single source of the authorization key. Older deployments used
/// `PRIVY_SIGNING_KEY` and `PRIVY_AUTH_KEY`; neither is read any more.
pub const PRIVY_AUTHORIZATION_KEY_ENV: &str = "PRIVY_AUTHORIZATION_KEY";
pub const PRIVY_API_BASE_URL_ENV: &str = "PRIVY_API_BASE_URL";
pub const PRIVY_VERIFICATION_KEY_ENV: &str = "PRIVY_VERIFICATION_KEY";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PRIVY_API_BASE_URL: &str = "https://auth.privy.io";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Privy credentials and endpoint.
///
/// Values are kept optional: a server without credentials still starts and
/// answers Privy routes with a misconfiguration error.
#[derive(Clone, Default)]
pub struct PrivyConfig {
    pub api_base_url: String,
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub authorization_key: Option<String>,
    /// PEM public key used to verify user access tokens.
    pub verification_key: Option<String>,
}

impl PrivyConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env_or_default(PRIVY_API_BASE_URL_ENV, DEFAULT_PRIVY_API_BASE_URL),
            app_id: env_optional(PRIVY_APP_ID_ENV),
            app_secret: env_optional(PRIVY_APP_SECRET_ENV),
            authorization_key: env_optional(PRIVY_AUTHORIZATION_KEY_ENV),
            verification_key: env_optional(PRIVY_VERIFICATION_KEY_ENV)
                .map(|pem| pem.replace("\\n", "\n")),
        }
    }

    /// Names of required variables that are unset.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.app_id.is_none() {
            missing.push(PRIVY_APP_ID_ENV);
        }
        if self.app_secret.is_none() {
            missing.push(PRIVY_APP_SECRET_ENV);
        }
        if self.authorization_key.is_none() {
            missing.push(PRIVY_AUTHORIZATION_KEY_ENV);
        }
        missing
    }

    pub fn is_configured(&self) -> bool {
        self.missing().is_empty()
    }
}

// Secrets stay out of logs and panics.
impl std::fmt::Debug for PrivyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivyConfig")
            .field("api_base_url", &self.api_base_url)
            .field("app_id", &self.app_id)
            .field("app_secret", &self.app_secret.as_ref().map(|_| "<redacted>"))
            .field(
                "authorization_key",
                &self.authorization_key.as_ref().map(|_| "<redacted>"),
            )
            .field("verification_key", &self.verification_key.is_some())
            .finish()
    }
}

/// PEM files for serving HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
    pub privy: PrivyConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env_optional(PORT_ENV)
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let tls = match (env_optional(TLS_CERT_PATH_ENV), env_optional(TLS_KEY_PATH_ENV)) {
            (Some(cert_path), Some(key_path)) => Some(TlsPaths {
                cert_path,
                key_path,
            }),
            _ => None,
        };

        Self {
            host: env_or_default(HOST_ENV, DEFAULT_HOST),
            port,
            tls,
            log_format: env_optional(LOG_FORMAT_ENV)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            privy: PrivyConfig::from_env(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Value of `name`, trimmed; unset and blank are both `None`.
pub fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
