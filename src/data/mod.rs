//! Data layer: the immutable observation table and the series resolver.
//!
//! Loads the OWID CSV once at startup and turns UI selections into
//! chart-ready time series. Nothing in here knows about the terminal.

mod models;
pub mod resolver;
mod store;

pub use models::{Interval, Metric, Selection, Series};
pub use resolver::{resolve, resolve_column};
pub use store::DataStore;
