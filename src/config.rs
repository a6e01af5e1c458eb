//! Image override configuration, injected into the defaulting stage.
//!
//! Keys are the per-client environment variable names (e.g. `BESU_IMAGE`).
//! Precedence when defaulting a spec: explicit spec image > override > built-in default.

use crate::Result;
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use tracing::debug;

/// Every image override key the node kinds consult.
pub const IMAGE_ENV_KEYS: &[&str] = &[
    crate::ethereum::clients::besu::IMAGE_ENV,
    crate::ethereum::clients::geth::IMAGE_ENV,
    crate::ethereum::clients::parity::IMAGE_ENV,
    crate::ethereum2::clients::teku::BEACON_NODE_IMAGE_ENV,
    crate::ethereum2::clients::teku::VALIDATOR_IMAGE_ENV,
    crate::ethereum2::clients::prysm::BEACON_NODE_IMAGE_ENV,
    crate::ethereum2::clients::prysm::VALIDATOR_IMAGE_ENV,
    crate::ethereum2::clients::lighthouse::BEACON_NODE_IMAGE_ENV,
    crate::ethereum2::clients::lighthouse::VALIDATOR_IMAGE_ENV,
    crate::ethereum2::clients::nimbus::BEACON_NODE_IMAGE_ENV,
    crate::ethereum2::clients::nimbus::VALIDATOR_IMAGE_ENV,
    crate::ipfs::go_ipfs::IMAGE_ENV,
    crate::ipfs::cluster_service::IMAGE_ENV,
    crate::chainlink::IMAGE_ENV,
    crate::aptos::IMAGE_ENV,
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    images: BTreeMap<String, String>,
}

impl ImageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every known override key from the process environment.
    pub fn from_env() -> Self {
        let mut images = BTreeMap::new();
        for key in IMAGE_ENV_KEYS {
            if let Ok(value) = std::env::var(key) {
                if !value.is_empty() {
                    debug!(key, image = %value, "image override from environment");
                    images.insert(key.to_string(), value);
                }
            }
        }
        Self { images }
    }

    /// Load `{ "images": { KEY: IMAGE } }` from a JSON file.
    pub fn from_file(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
        let config: ImageConfig =
            serde_json::from_str(&text).with_context(|| format!("parse config file {}", path))?;
        Ok(config)
    }

    /// Entries of `other` win.
    pub fn merge(mut self, other: ImageConfig) -> Self {
        self.images.extend(other.images);
        self
    }

    pub fn with_image(mut self, key: &str, image: &str) -> Self {
        self.images.insert(key.to_string(), image.to_string());
        self
    }

    pub fn override_for(&self, key: &str) -> Option<&str> {
        self.images.get(key).map(String::as_str)
    }

    /// Resolve an image following the precedence order.
    pub fn resolve(&self, explicit: Option<&str>, key: &str, default: &str) -> String {
        explicit
            .or_else(|| self.override_for(key))
            .unwrap_or(default)
            .to_string()
    }
}
