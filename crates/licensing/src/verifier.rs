//! # License Verification
//!
//! Offline verification of signed license tokens. The check order is part of
//! the contract and must not change:
//!
//! 1. **Parse**: structural decode; failure reports `invalid_format`.
//! 2. **Signature**: Ed25519 over the received `header.payload` bytes.
//! 3. **Expiry**: compared against the caller-supplied clock reading.
//! 4. **Machine binding**: only after the signature is sound.
//!
//! Expiry and binding are reported only for authentic tokens, so an attacker
//! learns nothing about the claims of a token they could not sign. This
//! module performs no I/O and reads no clocks; `now_ms` is always injected.

use crate::codec;
use crate::{LicensePayload, SignedLicense};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::Serialize;

/// Why offline verification rejected a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyReason {
    /// The token is structurally malformed.
    InvalidFormat,
    /// The Ed25519 signature does not match the token bytes.
    InvalidSignature,
    /// The token's `exp` lies in the past.
    Expired,
    /// The token is bound to a different machine.
    MachineMismatch,
}

/// Outcome of offline verification.
///
/// Invalid outcomes carry the payload when it could be decoded (expired or
/// wrong-machine tokens), letting display paths show what the license *was*.
/// Structurally broken or forged tokens carry no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The token is authentic, unexpired, and matches this machine.
    Valid(LicensePayload),
    /// The token was rejected.
    Invalid { reason: VerifyReason, payload: Option<LicensePayload> },
}

impl Verification {
    /// Whether the token passed every check.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The decoded payload, if any was recovered.
    #[must_use]
    pub const fn payload(&self) -> Option<&LicensePayload> {
        match self {
            Self::Valid(payload) => Some(payload),
            Self::Invalid { payload, .. } => payload.as_ref(),
        }
    }

    /// The rejection reason, or `None` for a valid token.
    #[must_use]
    pub const fn reason(&self) -> Option<VerifyReason> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid { reason, .. } => Some(*reason),
        }
    }
}

/// Verifies a license token against an Ed25519 public key.
///
/// `machine_id` enables the binding check: a token with a non-empty `mid`
/// verifies only on the machine it names, a token with an empty `mid`
/// verifies anywhere, and passing `None` disables the check entirely (used
/// by display paths that have no fingerprint at hand).
///
/// `now_ms` is the current wall time in milliseconds since the Unix epoch.
#[must_use]
pub fn verify_license(
    token: &str,
    public_key: &[u8; 32],
    machine_id: Option<&str>,
    now_ms: i64,
) -> Verification {
    // 1. Parse
    let Some(parsed) = SignedLicense::parse(token) else {
        return Verification::Invalid { reason: VerifyReason::InvalidFormat, payload: None };
    };

    // 2. Signature over the received bytes
    if !signature_is_valid(&parsed, public_key) {
        return Verification::Invalid { reason: VerifyReason::InvalidSignature, payload: None };
    }

    let payload = parsed.payload;

    // 3. Expiry
    if let Some(exp) = payload.exp
        && exp < now_ms
    {
        return Verification::Invalid {
            reason: VerifyReason::Expired,
            payload: Some(payload),
        };
    }

    // 4. Machine binding
    if let Some(machine_id) = machine_id
        && !payload.mid.is_empty()
        && payload.mid != machine_id
    {
        return Verification::Invalid {
            reason: VerifyReason::MachineMismatch,
            payload: Some(payload),
        };
    }

    Verification::Valid(payload)
}

fn signature_is_valid(parsed: &SignedLicense, public_key: &[u8; 32]) -> bool {
    let Ok(signature_bytes) = codec::decode_base64url(&parsed.signature_segment) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(&signature_bytes) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    verifying_key.verify(&parsed.signed_message(), &signature).is_ok()
}

/// Extracts the payload without any signature check. Display only.
#[must_use]
pub fn extract_payload(token: &str) -> Option<LicensePayload> {
    SignedLicense::parse(token).map(|parsed| parsed.payload)
}

/// Whether the token is past its expiry. Perpetual tokens never expire;
/// malformed tokens count as expired.
#[must_use]
pub fn is_expired(token: &str, now_ms: i64) -> bool {
    match extract_payload(token) {
        Some(payload) => payload.exp.is_some_and(|exp| exp < now_ms),
        None => true,
    }
}

/// Milliseconds until expiry: negative once expired, `None` for perpetual or
/// malformed tokens.
#[must_use]
pub fn time_remaining_ms(token: &str, now_ms: i64) -> Option<i64> {
    extract_payload(token)?.exp.map(|exp| exp - now_ms)
}
