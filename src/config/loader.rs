//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::Config;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported operating system: {0}")]
    UnsupportedOs(String),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Config file name for an operating system identity.
///
/// Accepts the names reported by `std::env::consts::OS`, plus `darwin`.
pub fn config_file_for_os(os: &str) -> Result<&'static str, ConfigError> {
    match os {
        "windows" => Ok("config.windows.json"),
        "linux" => Ok("config.linux.json"),
        "macos" | "darwin" => Ok("config.darwin.json"),
        other => Err(ConfigError::UnsupportedOs(other.to_string())),
    }
}

/// Load the config file for the host OS from the working directory.
pub fn load() -> Result<Config, ConfigError> {
    load_from_dir(Path::new("."), std::env::consts::OS)
}

/// Load the config file for `os` from `dir`.
pub fn load_from_dir(dir: &Path, os: &str) -> Result<Config, ConfigError> {
    let file_name = config_file_for_os(os)?;
    load_config(&dir.join(file_name))
}

/// Load and validate configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = serde_json::from_slice(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
