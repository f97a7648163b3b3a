use crate::handlers::print_verdict;
use crate::models::context::CliContext;
use anyhow::Result;

/// Stores a license key, then runs a normal check on it.
pub fn run(ctx: &CliContext, key: &str) -> Result<()> {
    let sdk = ctx.sdk()?;
    let verdict = sdk.store_license(key);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        print_verdict(&verdict);
    }

    if !verdict.valid {
        std::process::exit(1);
    }
    Ok(())
}
