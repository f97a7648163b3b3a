#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;

use crate::handlers::{activate, deactivate, fingerprint, inspect, status};
use crate::models::args::{AppCommands, Cli};
use crate::models::context::CliContext;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = CliContext {
        product_id: cli.product_id,
        public_key: cli.public_key,
        api_url: cli.api_url,
        config_path: cli.config,
        json: cli.json,
    };

    match cli.command {
        AppCommands::Status {} => status::run(&ctx)?,
        AppCommands::Activate { key } => activate::run(&ctx, &key)?,
        AppCommands::Deactivate {} => deactivate::run(&ctx)?,
        AppCommands::Inspect { key } => inspect::run(&ctx, &key)?,
        AppCommands::Fingerprint {} => fingerprint::run(&ctx),
        #[cfg(feature = "issuance")]
        AppCommands::Keygen {} => handlers::issue::keygen()?,
        #[cfg(feature = "issuance")]
        AppCommands::Issue { seed, license_id, customer_id, developer_id, features, days, bind_machine } => {
            handlers::issue::run(
                &ctx,
                &seed,
                &license_id,
                &customer_id,
                &developer_id,
                &features,
                days,
                bind_machine,
            )?;
        },
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "tuish=debug,tuish_licensing=debug,tuish_cli=debug"
    } else {
        "tuish=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
