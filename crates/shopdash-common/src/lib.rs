//! # Shopdash Common
//!
//! Shared error types, logging bootstrap and formatting utilities used by
//! every crate in the shopdash workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{DashboardError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use utils::*;
