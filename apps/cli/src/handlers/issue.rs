//! Development-only issuing commands, compiled behind the `issuance`
//! feature. Seeds handled here can forge licenses; keep them out of
//! production environments and shell history where possible.

use crate::models::context::CliContext;
use anyhow::{Context, Result, bail};
use tuish::clock::{Clock, SystemClock};
use tuish_licensing::LicensePayload;
use tuish_licensing::codec::{decode_hex, encode_hex};
use tuish_licensing::fingerprint::machine_fingerprint;
use tuish_licensing::synthesizer::{generate_keypair, spki_public_key, synthesize_token};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Generates a fresh Ed25519 signing keypair and prints both halves.
pub fn keygen() -> Result<()> {
    let (signing_key, verifying_key) = generate_keypair()?;

    println!("Signing seed (hex): {}", encode_hex(&signing_key.to_bytes()));
    println!("Public key (hex):   {}", encode_hex(&verifying_key.to_bytes()));
    println!("Public key (SPKI):  {}", spki_public_key(&verifying_key));
    println!();
    println!("Keep the signing seed private; ship only the public key.");
    Ok(())
}

/// Signs a development license token for the configured product.
#[allow(clippy::too_many_arguments)]
pub fn run(
    ctx: &CliContext,
    seed: &str,
    license_id: &str,
    customer_id: &str,
    developer_id: &str,
    features: &str,
    days: Option<u64>,
    bind_machine: bool,
) -> Result<()> {
    let product_id = ctx.require_product_id()?;

    let seed_bytes = decode_hex(seed).context("seed must be hex")?;
    let seed_bytes: [u8; 32] = match seed_bytes.try_into() {
        Ok(seed) => seed,
        Err(_) => bail!("seed must be exactly 32 bytes (64 hex characters)"),
    };

    let now_ms = SystemClock.now_ms();
    let payload = LicensePayload {
        lid: license_id.to_owned(),
        pid: product_id,
        cid: customer_id.to_owned(),
        did: developer_id.to_owned(),
        features: features
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_owned)
            .collect(),
        iat: now_ms,
        exp: days.map(|d| now_ms + i64::try_from(d).unwrap_or(0) * DAY_MS),
        mid: if bind_machine { machine_fingerprint() } else { String::new() },
    };

    let token = synthesize_token(&seed_bytes, &payload)?;
    println!("{token}");
    Ok(())
}
