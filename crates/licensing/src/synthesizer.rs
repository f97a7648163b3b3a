//! # Token Synthesis
//!
//! Signing routines used by vendor tooling and test suites to mint license
//! tokens. Strictly gated behind the `issuance` feature so that signing logic
//! and private key handling never reach client production builds.
//!
//! Handle seeds and [`SigningKey`]s as secrets: anyone holding one can forge
//! valid licenses for the matching public key.

use crate::error::LicenseError;
use crate::key::ED25519_SPKI_PREFIX;
use crate::{LicenseHeader, LicensePayload, codec};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use getrandom::fill;
use zeroize::Zeroize;

/// Signs a license token from a 32-byte seed.
///
/// The header and payload are serialized as minimal JSON, base64url-encoded
/// without padding, and the Ed25519 signature is computed over the ASCII
/// bytes `header_segment.payload_segment`, the same bytes every verifier
/// checks.
///
/// # Errors
/// Returns [`LicenseError::Serialize`] if either JSON body fails to
/// serialize.
pub fn synthesize_token(
    seed: &[u8; 32],
    payload: &LicensePayload,
) -> Result<String, LicenseError> {
    let signing_key = SigningKey::from_bytes(seed);

    let header_segment = codec::encode_base64url(&codec::to_compact_json(&LicenseHeader::default())?);
    let payload_segment = codec::encode_base64url(&codec::to_compact_json(payload)?);

    let message = format!("{header_segment}.{payload_segment}");
    let signature = signing_key.sign(message.as_bytes());

    Ok(format!("{message}.{}", codec::encode_base64url(&signature.to_bytes())))
}

/// Creates a new Ed25519 keypair for license signing and validation.
///
/// The temporary seed is drawn from the operating system's CSPRNG and zeroed
/// out once the keypair is derived.
///
/// # Errors
/// Returns [`LicenseError::Internal`] if the system RNG fails to provide
/// entropy, which usually indicates an environment-level problem.
pub fn generate_keypair() -> Result<(SigningKey, VerifyingKey), LicenseError> {
    let mut seed = [0u8; 32];

    fill(&mut seed).map_err(|e| LicenseError::Internal {
        message: e.to_string().into(),
        context: Some("Failed to generate seed".into()),
    })?;

    let signing_key = SigningKey::from_bytes(&seed);
    let verifying_key = signing_key.verifying_key();

    seed.zeroize();

    Ok((signing_key, verifying_key))
}

/// Renders a verifying key in the SPKI base64 form accepted by
/// [`crate::key::parse_public_key`], suitable for pasting into application
/// configuration.
#[must_use]
pub fn spki_public_key(key: &VerifyingKey) -> String {
    let mut blob = Vec::with_capacity(ED25519_SPKI_PREFIX.len() + 32);
    blob.extend_from_slice(&ED25519_SPKI_PREFIX);
    blob.extend_from_slice(key.as_bytes());
    codec::encode_base64(&blob)
}
