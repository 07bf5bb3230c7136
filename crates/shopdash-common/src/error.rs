//! Error types and utilities for shopdash

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for shopdash operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Main error type for shopdash operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The source dataset could not be opened or read
    #[error("Failed to load dataset '{path}': {message}")]
    Load {
        /// Path of the dataset
        path: String,
        /// Human-readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A typed column could not be parsed, or a required column is absent
    #[error("Parse error{}: {message}", location(.line, .column))]
    Parse {
        /// Human-readable description
        message: String,
        /// 1-based line in the source file, header included
        line: Option<usize>,
        /// Header name of the offending column
        column: Option<String>,
    },

    /// The requested date range is degenerate (start after end)
    #[error("Invalid date range: start {start} is after end {end}")]
    FilterRange {
        /// Selected first day
        start: NaiveDate,
        /// Selected last day
        end: NaiveDate,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for user input or configuration values
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description
        message: String,
        /// Offending configuration field
        field: Option<String>,
    },

    /// Chart rendering errors
    #[error("Graph error: {message}")]
    Graph {
        /// Human-readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn location(line: &Option<usize>, column: &Option<String>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at line {line}, column '{column}'"),
        (Some(line), None) => format!(" at line {line}"),
        (None, Some(column)) => format!(" in column '{column}'"),
        (None, None) => String::new(),
    }
}

impl DashboardError {
    /// Create a new load error
    pub fn load(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new load error with source
    pub fn load_with_source(
        path: impl Into<String>,
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Load {
            path: path.into(),
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a parse error that is not tied to a particular row
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
            line: None,
            column: None,
        }
    }

    /// Create a parse error for a specific line and column
    pub fn parse_at(msg: impl Into<String>, line: usize, column: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
            line: Some(line),
            column: Some(column.into()),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error must abort startup (as opposed to being reported
    /// back to the operator for a new selection)
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::FilterRange { .. } | Self::Validation { .. })
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to DashboardError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for DashboardError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
