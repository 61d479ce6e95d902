// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use base64ct::{Base64, Encoding};
use p256::ecdsa::{signature::Verifier, Signature, VerifyingKey};

use super::{SignablePayload, SignerError};

/// Check an authorization signature against a payload, the way Privy does.
///
/// Returns `Ok(false)` for a well-formed signature that does not match, and
/// an error when the signature is not base64 DER at all.
pub fn verify_signature(
    verifying_key: &VerifyingKey,
    payload: &SignablePayload,
    signature_b64: &str,
) -> Result<bool, SignerError> {
    let der = Base64::decode_vec(signature_b64.trim())
        .map_err(|e| SignerError::Signing(format!("invalid base64 signature: {e}")))?;
    let signature = Signature::from_der(&der)
        .map_err(|e| SignerError::Signing(format!("invalid DER signature: {e}")))?;

    let canonical = payload.canonical_bytes()?;
    Ok(verifying_key.verify(&canonical, &signature).is_ok())
}
