//! # CLI Argument Definitions
//!
//! This module defines the command-line interface structure using the `clap`
//! crate: global connection flags plus one subcommand per license operation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "tuish")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "License tooling for Tuish-powered terminal applications")]
pub struct Cli {
    /// Product to check entitlements for
    #[arg(long, env = "TUISH_PRODUCT_ID", global = true)]
    pub product_id: Option<String>,

    /// Ed25519 public key (64-char hex or SPKI base64)
    #[arg(long, env = "TUISH_PUBLIC_KEY", global = true)]
    pub public_key: Option<String>,

    /// Override the validation API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to a config file (default: ~/.tuish/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output JSON (headless mode for scripting)
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Verbose diagnostic logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: AppCommands,
}

/// Enumeration of available subcommands.
#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Check the current license and report a verdict (exit 1 when invalid)
    Status {},
    /// Store a license key, then verify it
    Activate {
        /// The license key to store
        key: String,
    },
    /// Remove the cached license for this product
    Deactivate {},
    /// Decode a license key for display, without verifying it
    Inspect {
        /// The license key to decode
        key: String,
    },
    /// Print this machine's fingerprint
    Fingerprint {},
    /// Generate a fresh Ed25519 signing keypair
    #[cfg(feature = "issuance")]
    Keygen {},
    /// Sign a development license token
    #[cfg(feature = "issuance")]
    Issue {
        /// 64-character hex signing seed
        #[arg(short, long)]
        seed: String,

        /// License identifier
        #[arg(long, default_value = "lic_dev")]
        license_id: String,

        /// Customer identifier
        #[arg(long, default_value = "cus_dev")]
        customer_id: String,

        /// Issuer/developer identifier
        #[arg(long, default_value = "dev_local")]
        developer_id: String,

        /// Comma-separated feature flags
        #[arg(short, long, default_value = "")]
        features: String,

        /// Days until expiry; perpetual when omitted
        #[arg(short, long)]
        days: Option<u64>,

        /// Bind the token to this machine's fingerprint
        #[arg(short, long)]
        bind_machine: bool,
    },
}
