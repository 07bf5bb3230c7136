//! # Shopdash Config
//!
//! YAML configuration schema, defaults, environment overrides and validation.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader, ConfigSource};
pub use settings::{
    ColumnsConfig, Config, DashboardConfig, DatasetConfig, GraphConfig, InvalidRangePolicy,
    LoggingConfig,
};
