// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tracing::{error, warn};

use crate::{
    auth::AuthConfig,
    config::PrivyConfig,
    error::ApiError,
    providers::privy::{PrivyClient, PrivyError},
};

/// Shared handler state.
///
/// The Privy client (and with it the parsed authorization key) is built once
/// and never mutated. When it cannot be built the reason is kept and every
/// Privy route answers with a misconfiguration error.
#[derive(Clone)]
pub struct AppState {
    privy: Result<Arc<PrivyClient>, Arc<PrivyError>>,
    pub auth_config: AuthConfig,
}

impl AppState {
    pub fn new(privy: Result<PrivyClient, PrivyError>) -> Self {
        Self {
            privy: privy.map(Arc::new).map_err(Arc::new),
            auth_config: AuthConfig::default(),
        }
    }

    /// Build state from configuration.
    ///
    /// Missing Privy credentials only disable the Privy routes. An invalid
    /// verification key is an error: access tokens are never silently
    /// accepted unverified when verification was asked for.
    pub fn from_config(config: &PrivyConfig) -> Result<Self, jsonwebtoken::errors::Error> {
        let privy = PrivyClient::from_config(config);
        if let Err(ref e) = privy {
            error!(error = %e, "Privy client unavailable; Privy routes will fail");
        }

        let auth_config =
            AuthConfig::from_pem(config.verification_key.as_deref(), config.app_id.as_deref())?;
        if !auth_config.is_verifying() {
            warn!("Access tokens are not verified (development mode)");
        }

        Ok(Self::new(privy).with_auth_config(auth_config))
    }

    pub fn with_auth_config(mut self, auth_config: AuthConfig) -> Self {
        self.auth_config = auth_config;
        self
    }

    /// The Privy client, or the 500 to answer with.
    pub fn privy(&self) -> Result<&PrivyClient, ApiError> {
        self.privy.as_deref().map_err(|_| ApiError::misconfigured())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Err(PrivyError::MissingConfig("not configured".to_string())))
    }
}
