use crate::models::context::CliContext;
use anyhow::{Result, bail};
use tuish::clock::{Clock, SystemClock};
use tuish_licensing::verifier::{extract_payload, time_remaining_ms};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Decodes a license key for display. No signature check: this shows what
/// the token claims, not whether it is authentic.
pub fn run(ctx: &CliContext, key: &str) -> Result<()> {
    let Some(payload) = extract_payload(key) else {
        bail!("not a well-formed license key");
    };

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let now_ms = SystemClock.now_ms();

    println!("License:  {}", payload.lid);
    println!("Product:  {}", payload.pid);
    println!("Customer: {}", payload.cid);
    println!("Issuer:   {}", payload.did);
    if !payload.features.is_empty() {
        println!("Features: {}", payload.features.join(", "));
    }
    if payload.mid.is_empty() {
        println!("Machine:  any");
    } else {
        println!("Machine:  {}", payload.mid);
    }

    match time_remaining_ms(key, now_ms) {
        None => println!("Expiry:   never (perpetual)"),
        Some(remaining) if remaining >= 0 => {
            println!("Expiry:   in {} day(s)", remaining / DAY_MS);
        },
        Some(remaining) => {
            println!("Expiry:   expired {} day(s) ago", -remaining / DAY_MS);
        },
    }

    println!();
    println!("Note: claims are unverified; run `tuish status` for a real check");
    Ok(())
}
