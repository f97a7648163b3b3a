//! SDK configuration.
//!
//! [`TuishConfig`] is the programmatic configuration record the SDK is
//! constructed from; `product_id` and `public_key` are the only required
//! fields. [`load_config`] is a file-plus-environment loader for front-ends
//! that keep credentials in `~/.tuish/config.json` and override them with
//! `TUISH__*` environment variables.

use crate::error::{SdkError, SdkErrorExt};
use config::{Config, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration consumed by the SDK core.
#[derive(Debug, Clone, Deserialize)]
pub struct TuishConfig {
    /// Product identifier this application checks entitlements for.
    pub product_id: String,
    /// Ed25519 public key, as 64-character hex or SPKI base64 (`MCow…`).
    pub public_key: String,
    /// Validation API base URL; the production URL when absent.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// API key passed opaquely to the validation service.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Cache directory override; `$TUISH_STORAGE_DIR` or `~/.tuish/licenses/`
    /// when absent.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    /// Enables diagnostic logging to stderr.
    #[serde(default)]
    pub debug: bool,
}

impl TuishConfig {
    /// Creates a configuration with the required fields; everything else
    /// defaults and can be chained on.
    #[must_use]
    pub fn new(product_id: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            public_key: public_key.into(),
            api_base_url: None,
            api_key: None,
            storage_dir: None,
            debug: false,
        }
    }

    /// Overrides the validation API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the API key for authenticated validation calls.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Overrides the license cache directory.
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Enables diagnostic logging to stderr.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// The default front-end configuration file: `~/.tuish/config.json`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".tuish").join("config.json")
}

/// A reusable configuration loader combining file-based settings with
/// environment overrides.
///
/// 1. **Base file**: the given path, or `~/.tuish/config.json` when `None`.
///    A missing file contributes nothing rather than failing.
/// 2. **Environment**: variables prefixed `TUISH__`, with `__` separating
///    nested keys (e.g. `TUISH__API_KEY`).
///
/// # Errors
/// Returns [`SdkError::Config`] if the file is present but malformed, the
/// environment overlay cannot be built, or the result does not deserialize
/// into `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, SdkError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(default_config_path, |p| p.as_ref().to_path_buf());

    debug!(path = %effective_path.display(), "Loading config");

    let config = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(Environment::with_prefix("TUISH").separator("__"))
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
