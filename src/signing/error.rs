// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

/// Failures while producing an authorization signature.
///
/// None of these are transient: the caller must abort the outbound request
/// and never send it unsigned.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// Signing key or app id missing or malformed.
    #[error("signing configuration invalid: {0}")]
    Configuration(String),

    /// The request body could not be turned into canonical JSON.
    #[error("request body cannot be canonicalized: {0}")]
    Canonicalization(String),

    /// The ECDSA primitive rejected the input.
    #[error("signing failed: {0}")]
    Signing(String),
}
