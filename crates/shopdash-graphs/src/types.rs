//! Chart styling and plot data types

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use shopdash_config::GraphConfig;

/// One bar of a bar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDatum {
    /// Axis label
    pub label: String,
    /// Bar length
    pub value: f64,
    /// Drawn in the highlight colour instead of the muted one
    pub highlighted: bool,
}

impl BarDatum {
    /// A bar in the muted colour
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            highlighted: false,
        }
    }
}

/// Resolved rendering settings shared by every chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Canvas fill
    pub background: RGBColor,
    /// Daily orders line and markers
    pub line: RGBColor,
    /// Emphasised bar
    pub highlight: RGBColor,
    /// Remaining bars
    pub muted: RGBColor,
    /// Font family for all text
    pub font_family: String,
    /// Tick label size
    pub font_size: u32,
    /// Draw grid lines along the value axis
    pub show_grid: bool,
}

impl ChartStyle {
    /// Resolve the `graph` configuration section
    pub fn from_config(config: &GraphConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            background: parse_color(&config.background_color),
            line: parse_color(&config.line_color),
            highlight: parse_color(&config.highlight_color),
            muted: parse_color(&config.muted_color),
            font_family: config.font_family.clone(),
            font_size: config.font_size,
            show_grid: config.show_grid,
        }
    }

    /// Caption size, a step above the tick labels
    pub fn title_size(&self) -> u32 {
        self.font_size + self.font_size / 2
    }

    /// Fill colour of a bar
    pub fn bar_color(&self, bar: &BarDatum) -> RGBColor {
        if bar.highlighted {
            self.highlight
        } else {
            self.muted
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from_config(&GraphConfig::default())
    }
}

/// Parse a `#RRGGBB` colour. Anything else falls back to black.
pub fn parse_color(color: &str) -> RGBColor {
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    RGBColor(0, 0, 0)
}
