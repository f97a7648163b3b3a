//! Public key parsing.
//!
//! Verifying keys reach the SDK as text in one of two forms:
//!
//! * 64 hex characters (the raw 32-byte key), or
//! * base64 of a 44-byte Ed25519 SubjectPublicKeyInfo (SPKI) DER blob, which
//!   always starts with `MCow` (or `MCoq` for some non-canonical encoders).
//!
//! Either way the result is the raw 32 key bytes. A key that parses is not
//! necessarily a valid curve point; that is checked at signature time.

use crate::codec;
use crate::error::LicenseError;

/// The 12-byte DER prefix of an Ed25519 SubjectPublicKeyInfo:
/// `SEQUENCE { SEQUENCE { OID 1.3.101.112 }, BIT STRING }`.
pub const ED25519_SPKI_PREFIX: [u8; 12] =
    [0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00];

/// Total length of an Ed25519 SPKI blob: prefix plus the 32 key bytes.
const SPKI_LEN: usize = ED25519_SPKI_PREFIX.len() + 32;

/// Base64 openings that mark the SPKI path.
const SPKI_BASE64_PREFIXES: [&str; 2] = ["MCow", "MCoq"];

/// Parses a public key from 64-character hex or SPKI base64 form.
///
/// # Errors
/// Returns [`LicenseError::InvalidPublicKey`] for any input that is neither
/// form, an SPKI blob of the wrong length, or an SPKI blob with a foreign
/// algorithm prefix. A misconfigured public key is a developer error and is
/// the one licensing condition that aborts SDK construction.
pub fn parse_public_key(input: &str) -> Result<[u8; 32], LicenseError> {
    if input.len() == 64 && input.bytes().all(|b| b.is_ascii_hexdigit()) {
        let bytes = codec::decode_hex(input)?;
        let key: [u8; 32] = bytes.try_into().map_err(|_| LicenseError::InvalidPublicKey {
            message: "hex key did not decode to 32 bytes".into(),
            context: None,
        })?;
        return Ok(key);
    }

    if SPKI_BASE64_PREFIXES.iter().any(|prefix| input.starts_with(prefix)) {
        let decoded =
            codec::decode_base64(input).map_err(|e| LicenseError::InvalidPublicKey {
                message: e.to_string().into(),
                context: Some("SPKI base64 decode failed".into()),
            })?;

        if decoded.len() != SPKI_LEN {
            return Err(LicenseError::InvalidPublicKey {
                message: format!("expected {SPKI_LEN}-byte SPKI blob, got {}", decoded.len())
                    .into(),
                context: None,
            });
        }
        if decoded[..ED25519_SPKI_PREFIX.len()] != ED25519_SPKI_PREFIX {
            return Err(LicenseError::InvalidPublicKey {
                message: "SPKI prefix is not Ed25519".into(),
                context: None,
            });
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&decoded[ED25519_SPKI_PREFIX.len()..]);
        return Ok(key);
    }

    Err(LicenseError::InvalidPublicKey {
        message: "expected 64-character hex or SPKI base64 (MCow...)".into(),
        context: None,
    })
}
