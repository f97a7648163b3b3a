//! # License Token Engine
//!
//! This crate provides the offline half of the Tuish licensing system: parsing
//! and verifying compact signed license tokens. It uses the Edwards-curve
//! Digital Signature Algorithm (Ed25519) so that tokens cannot be forged or
//! tampered with, and it performs no I/O of its own.
//!
//! ## Token format
//!
//! A token is three non-empty base64url segments joined by `.`:
//!
//! ```text
//! HEADER.PAYLOAD.SIGNATURE
//! ```
//!
//! `HEADER` and `PAYLOAD` decode to JSON objects; `SIGNATURE` decodes to the
//! raw 64-byte Ed25519 signature over the ASCII bytes
//! `HEADER.PAYLOAD` exactly as received. Verification never re-serializes the
//! payload: the signed message is the received bytes, which keeps the format
//! interoperable with every other SDK implementation bit for bit.
//!
//! ## Architecture
//!
//! * **Verification ([`verifier`]):** signature, expiry, and machine-binding
//!   checks included in every production build.
//! * **Synthesis ([`synthesizer`]):** signing logic used by vendor tooling and
//!   test suites. Gated behind the `issuance` feature.
//! * **Identity ([`fingerprint`]):** the stable machine fingerprint tokens may
//!   be bound to.

pub mod codec;
mod error;
pub mod fingerprint;
pub mod key;
#[cfg(feature = "issuance")]
pub mod synthesizer;
pub mod verifier;

pub use crate::error::{LicenseError, LicenseErrorExt};
use serde::{Deserialize, Serialize};

/// The only signature algorithm a token header may declare.
pub const TOKEN_ALG: &str = "ed25519";
/// The only token format version this crate understands.
pub const TOKEN_VER: u64 = 1;

/// A parsed license token.
///
/// Besides the decoded header and payload this keeps the original wire
/// segments, because the Ed25519 signature covers the received bytes and any
/// re-serialization would break verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedLicense {
    /// Decoded token header.
    pub header: LicenseHeader,
    /// Decoded entitlement claims.
    pub payload: LicensePayload,
    /// The header segment exactly as received.
    pub header_segment: String,
    /// The payload segment exactly as received.
    pub payload_segment: String,
    /// The base64url signature segment exactly as received.
    pub signature_segment: String,
}

impl SignedLicense {
    /// Parses a license token into its components.
    ///
    /// Returns `None` for anything that is not a well-formed token: wrong
    /// segment count, empty segments, undecodable header or payload, a header
    /// that does not declare exactly `ed25519`/version 1, or a payload with a
    /// missing or mistyped claim. This function is total and never panics;
    /// callers treat `None` as `invalid_format`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let mut parts = token.split('.');
        let header_segment = parts.next()?;
        let payload_segment = parts.next()?;
        let signature_segment = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        if header_segment.is_empty() || payload_segment.is_empty() || signature_segment.is_empty()
        {
            return None;
        }

        let header_bytes = codec::decode_base64url(header_segment).ok()?;
        let header: LicenseHeader = serde_json::from_slice(&header_bytes).ok()?;
        if header.alg != TOKEN_ALG || header.ver != TOKEN_VER {
            return None;
        }

        let payload_bytes = codec::decode_base64url(payload_segment).ok()?;
        let payload: LicensePayload = serde_json::from_slice(&payload_bytes).ok()?;

        Some(Self {
            header,
            payload,
            header_segment: header_segment.to_owned(),
            payload_segment: payload_segment.to_owned(),
            signature_segment: signature_segment.to_owned(),
        })
    }

    /// Returns the bytes the issuer signed: `header_segment.payload_segment`
    /// in their exact received form.
    #[must_use]
    pub fn signed_message(&self) -> Vec<u8> {
        let mut message =
            Vec::with_capacity(self.header_segment.len() + 1 + self.payload_segment.len());
        message.extend_from_slice(self.header_segment.as_bytes());
        message.push(b'.');
        message.extend_from_slice(self.payload_segment.as_bytes());
        message
    }
}

/// Token header. Unknown extra fields are tolerated; `alg` and `ver` must
/// match [`TOKEN_ALG`] and [`TOKEN_VER`] exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseHeader {
    /// Signature algorithm identifier.
    pub alg: String,
    /// Token format version.
    pub ver: u64,
}

impl Default for LicenseHeader {
    fn default() -> Self {
        Self { alg: TOKEN_ALG.to_owned(), ver: TOKEN_VER }
    }
}

/// The entitlement claims carried by a token.
///
/// Every field is required on the wire; `exp` is required but nullable
/// (`null` means the license never expires on time grounds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensePayload {
    /// License identifier.
    pub lid: String,
    /// Product identifier.
    pub pid: String,
    /// Customer identifier.
    pub cid: String,
    /// Issuer/developer identifier.
    pub did: String,
    /// Feature flags unlocked by this license; order is preserved.
    pub features: Vec<String>,
    /// Issued-at, milliseconds since the Unix epoch.
    pub iat: i64,
    /// Expiry in milliseconds, or `None` for a perpetual license.
    #[serde(deserialize_with = "nullable_timestamp")]
    pub exp: Option<i64>,
    /// Bound machine fingerprint; the empty string matches any machine.
    pub mid: String,
}

/// Required-but-nullable deserializer: a missing `exp` field is a malformed
/// payload, while an explicit `null` is a perpetual license. The
/// `deserialize_with` attribute suppresses serde's implicit `None` default
/// for `Option` fields, so absence becomes a hard error.
fn nullable_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_default_matches_constants() {
        let header = LicenseHeader::default();
        assert_eq!(header.alg, "ed25519");
        assert_eq!(header.ver, 1);
    }

    #[test]
    fn payload_requires_exp_field() {
        let missing_exp = r#"{"lid":"l","pid":"p","cid":"c","did":"d","features":[],"iat":1,"mid":""}"#;
        assert!(serde_json::from_str::<LicensePayload>(missing_exp).is_err());

        let null_exp = r#"{"lid":"l","pid":"p","cid":"c","did":"d","features":[],"iat":1,"exp":null,"mid":""}"#;
        let payload: LicensePayload = serde_json::from_str(null_exp).expect("null exp is valid");
        assert_eq!(payload.exp, None);
    }

    #[test]
    fn payload_rejects_mistyped_features() {
        let bad = r#"{"lid":"l","pid":"p","cid":"c","did":"d","features":"pro","iat":1,"exp":null,"mid":""}"#;
        assert!(serde_json::from_str::<LicensePayload>(bad).is_err());
    }
}
