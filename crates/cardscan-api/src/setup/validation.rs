//! Startup checks on top of `Config::validate`.

use anyhow::Result;
use cardscan_core::{Config, StorageConfig};

/// Fail fast on settings that would only break at request time.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.debug() {
        tracing::warn!("DEBUG is enabled in production; the UI shows a debug banner");
    }

    if let StorageConfig::Azure(azure) = &config.storage {
        if azure.signing_credentials().is_none() {
            tracing::warn!(
                container = %azure.container_name,
                "No signing credentials configured; blob URLs will be direct and the container must allow public read"
            );
        }
    }

    if let StorageConfig::Local(local) = &config.storage {
        if config.is_production() {
            return Err(anyhow::anyhow!(
                "Local storage backend ({}) is not supported in production; the document service cannot read local URLs",
                local.base_path
            ));
        }
    }

    Ok(())
}
