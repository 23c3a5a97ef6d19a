//! CLI configuration

use crate::error::{CliError, CliResult};
use bonification_types::EngineConfig;
use std::path::Path;

/// Load the engine configuration
///
/// A missing file yields the defaults; a present but invalid file is an error.
pub fn load(path: Option<&str>) -> CliResult<EngineConfig> {
    let config = match path {
        Some(p) if Path::new(p).exists() => {
            let contents = std::fs::read_to_string(p)?;
            toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?
        }
        Some(p) => {
            tracing::debug!(path = p, "Config file not found, using defaults");
            EngineConfig::default()
        }
        None => EngineConfig::default(),
    };

    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(config)
}
