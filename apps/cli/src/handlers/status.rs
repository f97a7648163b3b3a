use crate::handlers::print_verdict;
use crate::models::context::CliContext;
use anyhow::Result;

/// Runs a full license check and reports the verdict.
///
/// Exits with code 1 when the license is invalid, so scripts can gate on
/// `tuish status` directly.
pub fn run(ctx: &CliContext) -> Result<()> {
    let sdk = ctx.sdk()?;
    let verdict = sdk.check_license();

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
