//! # Shopdash
//!
//! Command-line front end: reads the order-items table, applies the selected
//! date range and writes the dashboard (charts, `index.html`, `snapshot.json`).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;

pub use app::{exit_status, render_summary, Dashboard, RunOutcome};
pub use cli::Cli;
