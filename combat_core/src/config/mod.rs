//! Configuration loading from TOML and JSON
//!
//! Designers describe stat templates and buff definitions in data files;
//! this module turns them into [`StatBlock`](crate::stat_block::StatBlock)s
//! and shared buff instances.

mod buffs;
mod templates;

pub use buffs::{BuffCatalog, BuffEntry, BuffKind};
pub use templates::{EntityTemplate, StatTemplate};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load a JSON string and deserialize it
pub fn parse_json<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = serde_json::from_str(content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let result: Result<StatTemplate, _> = load_toml(Path::new("/nonexistent/stats.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let result: Result<StatTemplate, _> = parse_toml("health = \"lots\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_bad_json_is_json_error() {
        let result: Result<StatTemplate, _> = parse_json("{ health: }");
        assert!(matches!(result, Err(ConfigError::JsonError(_))));
    }
}
