//! Shared CLI state: global flags resolved against the config file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tuish::{Tuish, TuishConfig};

/// Settings persisted in `~/.tuish/config.json`, overridable through
/// `TUISH__*` environment variables.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_base_url: Option<String>,
}

/// Global CLI flags, carried into every handler.
#[derive(Debug)]
pub struct CliContext {
    pub product_id: Option<String>,
    pub public_key: Option<String>,
    pub api_url: Option<String>,
    pub config_path: Option<PathBuf>,
    pub json: bool,
}

impl CliContext {
    /// The product id, which every SDK-backed command needs.
    pub fn require_product_id(&self) -> Result<String> {
        self.product_id.clone().context("missing --product-id (or TUISH_PRODUCT_ID)")
    }

    /// Builds the SDK from flags, environment, and the config file.
    /// Flag > file for the API base URL.
    pub fn sdk(&self) -> Result<Tuish> {
        let product_id = self.require_product_id()?;
        let public_key =
            self.public_key.clone().context("missing --public-key (or TUISH_PUBLIC_KEY)")?;

        let file: FileConfig = tuish::load_config(self.config_path.as_ref())
            .context("failed to load config file")?;

        let mut config = TuishConfig::new(product_id, public_key);
        if let Some(url) = self.api_url.clone().or(file.api_base_url) {
            config = config.with_api_base_url(url);
        }
        if let Some(api_key) = file.api_key {
            config = config.with_api_key(api_key);
        }

        Tuish::new(config).context("failed to initialize the Tuish SDK")
    }
}
