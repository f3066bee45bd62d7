//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::EchoConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `listener.port`.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid PORT value `{0}`")]
    Port(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where the listener port came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSource {
    /// `PORT` was set.
    Environment,
    /// `PORT` was unset; the config file (or built-in default) applies.
    Config,
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<EchoConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<EchoConfig, ConfigError> {
    let config: EchoConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply a `PORT` value (as read from the environment) to the config.
pub fn apply_port(config: &mut EchoConfig, port: Option<&str>) -> Result<PortSource, ConfigError> {
    match port.map(str::trim) {
        None | Some("") => Ok(PortSource::Config),
        Some(raw) => {
            config.listener.port = raw
                .parse()
                .map_err(|_| ConfigError::Port(raw.to_string()))?;
            Ok(PortSource::Environment)
        }
    }
}

/// Apply `PORT` from the process environment.
pub fn apply_env(config: &mut EchoConfig) -> Result<PortSource, ConfigError> {
    let port = std::env::var(PORT_ENV).ok();
    apply_port(config, port.as_deref())
}
