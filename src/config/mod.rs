//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<BridgeConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: BridgeConfig = serde_yaml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// Load from `path` if given, otherwise use the built-in show defaults
pub fn load_or_default(path: Option<&Path>) -> Result<BridgeConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = BridgeConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}
