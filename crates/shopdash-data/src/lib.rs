//! # Shopdash Data
//!
//! Loads the order-items table, restricts it to a date range and derives the
//! six aggregate views shown on the dashboard.
//!
//! Data flows one way: [`DatasetLoader`] → [`RangeFilter`] → aggregations →
//! [`DashboardSnapshot`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod filter;
pub mod loader;
pub mod record;
pub mod snapshot;

pub use aggregator::*;
pub use filter::{DateRange, FilteredOrders, RangeFilter};
pub use loader::DatasetLoader;
pub use record::{OrderRecord, OrderTable};
pub use snapshot::DashboardSnapshot;
