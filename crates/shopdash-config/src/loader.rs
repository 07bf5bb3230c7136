//! Configuration loading utilities

use crate::Config;
use shopdash_common::{DashboardError, Result as DashboardResult};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "SHOPDASH_CONFIG_PATH";

/// Files searched in the working directory when no path is given
const DEFAULT_CONFIG_FILES: [&str; 2] = ["shopdash.yaml", "shopdash.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for DashboardError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ValidationError(errors) => DashboardError::validation(errors.to_string()),
            other => DashboardError::config_with_source("Failed to load configuration", other),
        }
    }
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A YAML file
    File(PathBuf),
    /// No file found; built-in defaults plus environment overrides
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::parse_with(&content, |var| env::var(var).ok())?;
        debug!(path = %path.as_ref().display(), "Configuration file parsed");
        Ok(config)
    }

    /// Parse YAML content, apply overrides from `lookup` and validate the result.
    ///
    /// `lookup` resolves an environment variable name to its value.
    pub fn parse_with<F>(content: &str, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty document deserializes to unit, not to a defaulted struct
        let mut config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)?
        };

        Self::apply_overrides(&mut config, &lookup)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from the environment and the working directory.
    ///
    /// Search order: `SHOPDASH_CONFIG_PATH`, `shopdash.yaml`, `shopdash.yml`,
    /// then built-in defaults. Environment overrides apply in every case.
    pub fn load() -> DashboardResult<Config> {
        let (config, source) = Self::load_with_source()?;
        info!(source = %source, "Configuration loaded");
        Ok(config)
    }

    /// Like [`ConfigLoader::load`], but reports where the configuration came
    /// from instead of logging it, for callers that set up logging afterwards.
    pub fn load_with_source() -> DashboardResult<(Config, ConfigSource)> {
        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            let config = Self::load_config(&config_path)?;
            return Ok((config, ConfigSource::File(PathBuf::from(config_path))));
        }

        for candidate in DEFAULT_CONFIG_FILES {
            if Path::new(candidate).exists() {
                let config = Self::load_config(candidate)?;
                return Ok((config, ConfigSource::File(PathBuf::from(candidate))));
            }
        }

        let config = Self::parse_with("", |var| env::var(var).ok())?;
        Ok((config, ConfigSource::Defaults))
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DashboardResult<Config> {
        Ok(Self::load_config(path)?)
    }

    fn apply_overrides<F>(config: &mut Config, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("SHOPDASH_DATA_PATH") {
            config.dataset.path = path;
        }

        if let Some(dir) = lookup("SHOPDASH_OUTPUT_DIR") {
            config.dashboard.output_dir = dir;
        }

        if let Some(logo) = lookup("SHOPDASH_LOGO_PATH") {
            config.dashboard.logo_path = logo;
        }

        if let Some(top_n) = lookup("SHOPDASH_TOP_N") {
            config.dashboard.top_n = parse_var("SHOPDASH_TOP_N", &top_n)?;
        }

        if let Some(width) = lookup("SHOPDASH_GRAPH_WIDTH") {
            config.graph.width = parse_var("SHOPDASH_GRAPH_WIDTH", &width)?;
        }

        if let Some(height) = lookup("SHOPDASH_GRAPH_HEIGHT") {
            config.graph.height = parse_var("SHOPDASH_GRAPH_HEIGHT", &height)?;
        }

        if let Some(level) = lookup("SHOPDASH_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}
