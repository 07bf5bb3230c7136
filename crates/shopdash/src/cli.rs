//! Command-line arguments

use chrono::NaiveDate;
use clap::Parser;
use shopdash_common::{DashboardError, Result};
use shopdash_config::{Config, ConfigError, ConfigLoader, ConfigSource};
use std::path::PathBuf;

/// Render the e-commerce order dashboard for a date range
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "shopdash", version, about)]
pub struct Cli {
    /// Configuration file (YAML). Defaults to shopdash.yaml in the working directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Order-items CSV file
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// First day of the range, inclusive. Defaults to the earliest purchase
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start: Option<NaiveDate>,

    /// Last day of the range, inclusive. Defaults to the latest purchase
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end: Option<NaiveDate>,

    /// Directory receiving the charts and the dashboard page
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Number of bars in the ranked charts
    #[arg(long, value_name = "N")]
    pub top_n: Option<usize>,

    /// Log filter, e.g. "debug" or "shopdash_data=trace,info"
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Compute and print the metrics without writing any files
    #[arg(long)]
    pub no_charts: bool,
}

impl Cli {
    /// Load the configuration named by `--config` (or found by the default
    /// search), apply the flag overrides and validate the result.
    ///
    /// Nothing is logged here; the returned source is reported once logging
    /// has been set up from the loaded configuration.
    pub fn load_config(&self) -> Result<(Config, ConfigSource)> {
        let (mut config, source) = match &self.config {
            Some(path) => (
                ConfigLoader::load_from_file(path)?,
                ConfigSource::File(path.clone()),
            ),
            None => ConfigLoader::load_with_source()?,
        };

        self.apply_to(&mut config);
        config
            .validate_all()
            .map_err(|e| DashboardError::from(ConfigError::ValidationError(e)))?;

        Ok((config, source))
    }

    /// Apply the flags that override configuration values
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(data) = &self.data {
            config.dataset.path = data.display().to_string();
        }
        if let Some(output) = &self.output {
            config.dashboard.output_dir = output.display().to_string();
        }
        if let Some(top_n) = self.top_n {
            config.dashboard.top_n = top_n;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}
