//! Application configuration structures

use serde::{Deserialize, Serialize};
use shopdash_common::CurrencyStyle;
use validator::{Validate, ValidationError, ValidationErrors};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Source dataset location and column mapping
    #[validate]
    pub dataset: DatasetConfig,

    /// Dashboard output and filtering behaviour
    #[validate]
    pub dashboard: DashboardConfig,

    /// Chart rendering settings
    #[validate]
    pub graph: GraphConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingConfig,
}

/// Where the order table lives and how to read it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the delimited order-items file
    #[validate(length(min = 1, message = "Dataset path cannot be empty"))]
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Dataset path contains invalid characters"))]
    pub path: String,

    /// Field delimiter (single ASCII character)
    pub delimiter: char,

    /// Column names of the required fields
    #[validate]
    pub columns: ColumnsConfig,
}

/// Header names of the required columns. The defaults are the column names
/// of the public order-items export the dashboard was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ColumnsConfig {
    /// Order identifier
    #[validate(length(min = 1))]
    pub order_id: String,
    /// Purchase date and time
    #[validate(length(min = 1))]
    pub purchase_timestamp: String,
    /// Item price
    #[validate(length(min = 1))]
    pub price: String,
    /// Customer identifier
    #[validate(length(min = 1))]
    pub customer_id: String,
    /// Customer city
    #[validate(length(min = 1))]
    pub customer_city: String,
    /// Seller identifier
    #[validate(length(min = 1))]
    pub seller_id: String,
    /// Seller city
    #[validate(length(min = 1))]
    pub seller_city: String,
    /// Product category name
    #[validate(length(min = 1))]
    pub product_category: String,
    /// Review score
    #[validate(length(min = 1))]
    pub review_score: String,
    /// Payment method
    #[validate(length(min = 1))]
    pub payment_type: String,
}

/// What to do when the selected start date is after the end date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRangePolicy {
    /// Fail with a range error that is reported to the operator
    #[default]
    Reject,
    /// Treat the selection as matching nothing
    Empty,
}

/// Dashboard output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardConfig {
    /// Page header
    #[validate(length(min = 1, max = 120, message = "Title must be between 1 and 120 characters"))]
    pub title: String,

    /// Directory that receives the chart images and the HTML page
    #[validate(length(min = 1, message = "Output directory cannot be empty"))]
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Output directory contains invalid characters"))]
    pub output_dir: String,

    /// Logo shown in the page sidebar
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Logo path contains invalid characters"))]
    pub logo_path: String,

    /// Number of bars in the ranked charts
    #[validate(range(min = 1, max = 50, message = "Top N must be between 1 and 50"))]
    pub top_n: usize,

    /// Handling of a start date after the end date
    pub invalid_range: InvalidRangePolicy,

    /// Revenue display format
    pub currency: CurrencyStyle,
}

/// Chart rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphConfig {
    /// Chart width in pixels
    #[validate(range(min = 200, max = 4000, message = "Width must be between 200 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(min = 200, max = 4000, message = "Height must be between 200 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be valid hex color"))]
    pub background_color: String,

    /// Color of the daily orders line
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Line color must be valid hex color"))]
    pub line_color: String,

    /// Color of the emphasised bar in ranked charts
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Highlight color must be valid hex color"))]
    pub highlight_color: String,

    /// Color of the remaining bars
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Muted color must be valid hex color"))]
    pub muted_color: String,

    /// Font family for all chart text
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    /// Base font size; titles are drawn larger
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,

    /// Whether to draw grid lines
    pub show_grid: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Optional log file path
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Log file path contains invalid characters"))]
    pub file: Option<String>,

    /// Emit JSON lines
    pub json: bool,

    /// Log span open/close events
    pub include_spans: bool,
}

impl Config {
    /// Derive-based validation plus the cross-field checks derive cannot express
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;

        let mut errors = ValidationErrors::new();

        if !self.dataset.delimiter.is_ascii() || self.dataset.delimiter.is_ascii_alphanumeric() {
            errors.add("delimiter", ValidationError::new("invalid_delimiter"));
        }

        if self.dashboard.currency.decimals > 4 {
            errors.add("currency", ValidationError::new("too_many_decimals"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Logging settings in the form the subscriber bootstrap expects
    pub fn logging_config(&self) -> shopdash_common::LoggingConfig {
        shopdash_common::LoggingConfig {
            level: self.logging.level.clone(),
            json_format: self.logging.json,
            file_path: self.logging.file.clone(),
            include_spans: self.logging.include_spans,
            ..shopdash_common::LoggingConfig::default()
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: "data/all_data.csv".to_string(),
            delimiter: ',',
            columns: ColumnsConfig::default(),
        }
    }
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            order_id: "order_id".to_string(),
            purchase_timestamp: "order_purchase_timestamp".to_string(),
            price: "price".to_string(),
            customer_id: "customer_id".to_string(),
            customer_city: "customer_city".to_string(),
            seller_id: "seller_id".to_string(),
            seller_city: "seller_city".to_string(),
            product_category: "product_category_name_english".to_string(),
            review_score: "review_score".to_string(),
            payment_type: "payment_type".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "E-Commerce Dashboard".to_string(),
            output_dir: "dashboard".to_string(),
            logo_path: "asset/logo.png".to_string(),
            top_n: 5,
            invalid_range: InvalidRangePolicy::default(),
            currency: CurrencyStyle::default(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            background_color: "#FFFFFF".to_string(),
            line_color: "#90CAF9".to_string(),
            highlight_color: "#72BCD4".to_string(),
            muted_color: "#D3D3D3".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 14,
            show_grid: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json: false,
            include_spans: false,
        }
    }
}
