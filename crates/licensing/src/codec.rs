//! Wire encoding primitives shared across the token engine.
//!
//! Tokens use base64url without padding; public keys additionally use
//! standard base64 (SPKI) and bare hex. Decoders are strict about the
//! alphabet but tolerate trailing `=` padding on base64 input.

use crate::error::LicenseError;
use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};

/// Encodes bytes as base64url without trailing padding.
#[must_use]
pub fn encode_base64url(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes a base64url string, with or without trailing `=` padding.
///
/// # Errors
/// Returns [`LicenseError::Encoding`] for bytes outside the base64url
/// alphabet or a non-canonical final character.
pub fn decode_base64url(input: &str) -> Result<Vec<u8>, LicenseError> {
    URL_SAFE_NO_PAD.decode(input.trim_end_matches('=')).map_err(|e| LicenseError::Encoding {
        message: e.to_string().into(),
        context: Some("base64url decode failed".into()),
    })
}

/// Decodes a standard-alphabet base64 string, with or without padding.
///
/// # Errors
/// Returns [`LicenseError::Encoding`] for bytes outside the standard
/// base64 alphabet.
pub fn decode_base64(input: &str) -> Result<Vec<u8>, LicenseError> {
    STANDARD_NO_PAD.decode(input.trim_end_matches('=')).map_err(|e| LicenseError::Encoding {
        message: e.to_string().into(),
        context: Some("base64 decode failed".into()),
    })
}

/// Encodes bytes as standard base64 without padding.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD_NO_PAD.encode(data)
}

/// Encodes bytes as lowercase hex.
#[must_use]
pub fn encode_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decodes a hex string (case-insensitive).
///
/// # Errors
/// Returns [`LicenseError::Encoding`] for odd-length input or non-hex digits.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, LicenseError> {
    hex::decode(input).map_err(|e| LicenseError::Encoding {
        message: e.to_string().into(),
        context: Some("hex decode failed".into()),
    })
}

/// Serializes a value to minimal JSON (no whitespace) bytes.
///
/// # Errors
/// Returns [`LicenseError::Serialize`] if serialization fails.
pub fn to_compact_json<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, LicenseError> {
    serde_json::to_vec(value).map_err(LicenseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64url_round_trips_all_byte_values() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let encoded = encode_base64url(&bytes);
        assert!(!encoded.contains('='));
        assert_eq!(decode_base64url(&encoded).unwrap(), bytes);
    }

    #[test]
    fn base64url_accepts_padded_input() {
        // "f" encodes to "Zg" unpadded, "Zg==" padded.
        assert_eq!(decode_base64url("Zg").unwrap(), b"f");
        assert_eq!(decode_base64url("Zg==").unwrap(), b"f");
    }

    #[test]
    fn base64url_rejects_foreign_alphabet() {
        assert!(decode_base64url("a+b/").is_err());
        assert!(decode_base64url("not base64!").is_err());
    }

    #[test]
    fn hex_round_trips_and_ignores_case() {
        let bytes = vec![0x00, 0x7f, 0xde, 0xad];
        let encoded = encode_hex(&bytes);
        assert_eq!(encoded, "007fdead");
        assert_eq!(decode_hex("007FDEAD").unwrap(), bytes);
        assert!(decode_hex("00zz").is_err());
    }

    #[test]
    fn compact_json_has_no_whitespace() {
        let json = to_compact_json(&serde_json::json!({"alg": "ed25519", "ver": 1})).unwrap();
        assert_eq!(json, br#"{"alg":"ed25519","ver":1}"#);
    }
}
