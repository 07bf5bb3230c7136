//! # Shopdash Graphs
//!
//! Turns a [`shopdash_data::DashboardSnapshot`] into the six dashboard charts
//! and the static page that shows them.
//!
//! Charts are drawn with plotters into an in-memory RGB buffer and encoded as
//! PNG. [`GraphManager`] renders them concurrently on the blocking pool.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bar_chart;
pub mod daily_orders;
pub mod manager;
pub mod ranked;
pub mod renderer;
pub mod report;
pub mod types;

pub use bar_chart::{PaymentTypeChart, ProductPerformanceChart, RankedBarChart};
pub use daily_orders::DailyOrdersChart;
pub use manager::{GraphManager, RenderedChart};
pub use renderer::ChartRenderer;
pub use report::ReportWriter;
pub use types::{parse_color, BarDatum, ChartStyle};
