use crate::models::context::CliContext;
use anyhow::Result;

/// Removes the cached license for this product.
pub fn run(ctx: &CliContext) -> Result<()> {
    let sdk = ctx.sdk()?;
    sdk.clear_license();

    if ctx.json {
        println!(r#"{{"cleared":true}}"#);
    } else {
        println!("✅ Cached license removed");
    }
    Ok(())
}
