// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Browser requests that reveal user data (email lookup, key export) must
//! carry the user's Privy access token.
//!
//! ## Auth Flow
//!
//! 1. Frontend authenticates the user with Privy
//! 2. Frontend sends `Authorization: Bearer <Privy access token>`
//! 3. Server:
//!    - With `PRIVY_VERIFICATION_KEY`: verifies the ES256 signature, expiry,
//!      issuer (`privy.io`) and audience (app id)
//!    - Without it: checks only that a bearer token is present
//!
//! Clock skew tolerance is 60 seconds.

pub mod error;
pub mod extractor;

pub use error::AuthError;
pub use extractor::{Auth, AuthConfig, Caller};
