//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::BridgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<BridgeConfig, ConfigError> {
    let config = normalize(toml::from_str(content)?);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// An empty `base_host` means no override.
fn normalize(mut config: BridgeConfig) -> BridgeConfig {
    config.bridge.base_host = config.bridge.base_host.filter(|host| !host.is_empty());
    config
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub channel: Option<String>,
    pub base_host: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Apply the overrides and re-validate.
    pub fn apply(self, mut config: BridgeConfig) -> Result<BridgeConfig, ConfigError> {
        if let Some(bind_address) = self.bind_address {
            config.listener.bind_address = bind_address;
        }
        if let Some(channel) = self.channel {
            config.bridge.channel = channel;
        }
        if let Some(base_host) = self.base_host {
            config.bridge.base_host = Some(base_host);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.bridge.timeout_secs = timeout_secs;
        }

        let config = normalize(config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
