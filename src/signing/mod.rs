// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Privy request-authorization signatures.
//!
//! Every mutating call to the Privy wallet API carries a
//! `privy-authorization-signature` header. The header value is an ECDSA
//! P-256/SHA-256 signature over the RFC 8785 (JCS) serialization of:
//!
//! ```json
//! {"version":1,"method":"POST","url":"https://…","body":{…},"headers":{"privy-app-id":"…"}}
//! ```
//!
//! Privy rebuilds the same document on its side, so the canonical bytes must
//! match exactly.
//!
//! - `canonical` - JCS serialization of `serde_json::Value`
//! - `key` - authorization key loading (raw base64 → PEM → P-256 key)
//! - `payload` - the signed document
//! - `signer` - [`RequestSigner`], the entry point used by the Privy client
//! - `verify` - local verification against a public key

pub mod canonical;
pub mod error;
pub mod key;
pub mod payload;
pub mod signer;
pub mod verify;

pub use error::SignerError;
pub use key::{load_signing_key, SigningKeyHandle};
pub use payload::SignablePayload;
pub use signer::RequestSigner;
pub use verify::verify_signature;

/// Header carrying the base64 authorization signature.
pub const SIGNATURE_HEADER: &str = "privy-authorization-signature";

/// Header carrying the Privy application id.
pub const APP_ID_HEADER: &str = "privy-app-id";
