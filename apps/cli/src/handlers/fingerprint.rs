use crate::models::context::CliContext;
use tuish_licensing::fingerprint::machine_fingerprint;

/// Prints this machine's fingerprint, as used for license binding.
pub fn run(ctx: &CliContext) {
    let fingerprint = machine_fingerprint();
    if ctx.json {
        println!(r#"{{"machine_fingerprint":"{fingerprint}"}}"#);
    } else {
        println!("{fingerprint}");
    }
}
