// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Privy Wallet Server - backend-for-frontend for Privy wallet custody
//!
//! The browser never holds the Privy app secret or the authorization key.
//! This service holds both, signs every Privy wallet API request and relays
//! a small set of operations for the wallet UI.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Privy access token extraction
//! - `signing` - Privy authorization signatures (JCS + ECDSA P-256)
//! - `providers` - Privy API client

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod providers;
pub mod signing;
pub mod state;

#[cfg(test)]
mod test_support;
