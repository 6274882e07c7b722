//! Configuration loading for map renders
//!
//! A render takes its configuration from exactly one source: a config
//! value built in code (or from CLI flags), or a TOML file on disk.

use super::schema::MapConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML parsing error
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
    /// Every layer toggle is off
    #[error("All layers are disabled; enable at least one of background, blocks, walls, liquids or wires")]
    AllLayersDisabled,
    /// Both an inline config and a config file were supplied
    #[error("Provide either an inline config or a config file, not both")]
    SourceConflict,
    /// Neither an inline config nor a config file was supplied
    #[error("Either an inline config or a config file must be provided")]
    NoSource,
}

/// Where a render's configuration comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Config assembled in code or from command-line flags
    Inline(MapConfig),
    /// TOML file to read
    File(PathBuf),
}

impl ConfigSource {
    /// Pick the single configuration source out of two optional ones.
    ///
    /// # Example
    /// ```
    /// use worldmap::config::{ConfigError, ConfigSource, MapConfig};
    ///
    /// let source = ConfigSource::resolve(Some(MapConfig::new("w.json", "w.png")), None).unwrap();
    /// assert!(matches!(source, ConfigSource::Inline(_)));
    ///
    /// assert!(matches!(ConfigSource::resolve(None, None), Err(ConfigError::NoSource)));
    /// ```
    pub fn resolve(inline: Option<MapConfig>, path: Option<&Path>) -> Result<Self, ConfigError> {
        match (inline, path) {
            (Some(_), Some(_)) => Err(ConfigError::SourceConflict),
            (None, None) => Err(ConfigError::NoSource),
            (Some(config), None) => Ok(ConfigSource::Inline(config)),
            (None, Some(path)) => Ok(ConfigSource::File(path.to_path_buf())),
        }
    }

    /// Produce a validated config.
    pub fn load(self) -> Result<MapConfig, ConfigError> {
        let config = match self {
            ConfigSource::Inline(config) => config,
            ConfigSource::File(path) => parse_config_file(&path)?,
        };
        check_config(&config)?;
        Ok(config)
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config_file(path: &Path) -> Result<MapConfig, ConfigError> {
    ConfigSource::File(path.to_path_buf()).load()
}

/// Parse configuration from a TOML string without validating it.
pub fn parse_config_str(contents: &str) -> Result<MapConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

fn parse_config_file(path: &Path) -> Result<MapConfig, ConfigError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    parse_config_str(&contents)
}

/// Reject configs that cannot produce a map.
///
/// A config with no layers switched on fails with
/// [`ConfigError::AllLayersDisabled`] ahead of any other problem.
pub fn check_config(config: &MapConfig) -> Result<(), ConfigError> {
    if config.draw.layers().is_empty() {
        return Err(ConfigError::AllLayersDisabled);
    }
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}
