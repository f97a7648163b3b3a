//! # Tuish Client SDK
//!
//! Offline-first license checks for terminal applications. The SDK decides,
//! at startup and on demand, whether the current user holds a valid
//! entitlement for a product on this machine, combining three subsystems:
//!
//! 1. An on-disk cache of the license token ([`cache`]).
//! 2. Offline Ed25519 verification ([`tuish_licensing`]).
//! 3. A single authenticated online validation call ([`remote`]).
//!
//! The hot path, a fresh cache holding a valid token, touches no network
//! at all. See [`resolver`] for the full decision tree.
//!
//! ## Usage
//!
//! ```no_run
//! use tuish::{Tuish, TuishConfig};
//!
//! let sdk = Tuish::new(TuishConfig::new(
//!     "prod_xxx",
//!     "MCowBQYDK2VwAyEA...",
//! ))?;
//!
//! let verdict = sdk.check_license();
//! if verdict.valid {
//!     println!("Licensed!");
//! }
//! # Ok::<(), tuish::SdkError>(())
//! ```

pub mod cache;
pub mod clock;
pub mod config;
mod error;
pub mod remote;
pub mod resolver;
mod verdict;

pub use crate::config::{TuishConfig, load_config};
pub use crate::error::{SdkError, SdkErrorExt};
pub use crate::verdict::{LicenseDetails, LicenseStatus, ReasonCode, Verdict, VerdictSource};
pub use tuish_licensing::{LicenseError, LicensePayload};

use crate::cache::LicenseCache;
use crate::clock::SystemClock;
use crate::remote::HttpValidator;
use crate::resolver::Resolver;
use tracing::debug;
use tuish_licensing::verifier::{extract_payload, is_expired};

/// The SDK entry point for one product.
///
/// Construction is the only fallible step: the public key is parsed eagerly
/// because a misconfigured key is a developer error, not a runtime
/// condition. Every call after that reports through [`Verdict`] values.
#[derive(Debug)]
pub struct Tuish {
    config: TuishConfig,
    resolver: Resolver<HttpValidator, SystemClock>,
}

impl Tuish {
    /// Builds the SDK from a configuration record.
    ///
    /// # Errors
    /// Returns [`SdkError::License`] if the public key is neither 64-char hex
    /// nor SPKI base64, and [`SdkError::Http`] if the validation client
    /// cannot be constructed.
    pub fn new(config: TuishConfig) -> Result<Self, SdkError> {
        if config.debug {
            init_debug_logging();
        }

        let public_key = tuish_licensing::key::parse_public_key(&config.public_key)?;
        let key_hex = hex::encode(public_key);
        debug!(key_prefix = %&key_hex[..16], "Parsed public key");

        let storage_dir =
            config.storage_dir.clone().unwrap_or_else(LicenseCache::default_dir);
        let cache = LicenseCache::new(storage_dir);

        let validator =
            HttpValidator::new(config.api_base_url.as_deref(), config.api_key.clone())?;

        let resolver =
            Resolver::new(config.product_id.clone(), public_key, cache, validator, SystemClock);

        Ok(Self { config, resolver })
    }

    /// Checks whether the user holds a valid license.
    ///
    /// Offline verification runs first; the network is only consulted when
    /// the cached record is stale or expired.
    #[must_use]
    pub fn check_license(&self) -> Verdict {
        self.resolver.check()
    }

    /// Stores a license key (pasted or from a completed purchase) and runs a
    /// normal check on it.
    pub fn store_license(&self, license_key: &str) -> Verdict {
        self.resolver.store(license_key)
    }

    /// The cached license key, without verification.
    #[must_use]
    pub fn cached_license_key(&self) -> Option<String> {
        self.resolver.cached_license_key()
    }

    /// Clears the cached license for this product.
    pub fn clear_license(&self) {
        self.resolver.clear();
    }

    /// Extracts license details from a token without any signature check.
    /// Display only: `status` reflects expiry alone, never authenticity.
    #[must_use]
    pub fn extract_license_info(&self, license_key: &str) -> Option<LicenseDetails> {
        let payload = extract_payload(license_key)?;
        let status = if is_expired(license_key, self.resolver.now_ms()) {
            LicenseStatus::Expired
        } else {
            LicenseStatus::Active
        };
        Some(LicenseDetails::from_payload(&payload, status))
    }

    /// This machine's fingerprint.
    #[must_use]
    pub fn machine_fingerprint(&self) -> &str {
        self.resolver.machine_fingerprint()
    }

    /// The configuration this SDK was built with.
    #[must_use]
    pub const fn config(&self) -> &TuishConfig {
        &self.config
    }
}

/// Best-effort stderr diagnostics for `debug = true` configurations. Quietly
/// steps aside when the host application already installed a subscriber.
fn init_debug_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tuish=debug,tuish_licensing=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
