//! Order execution and reporting.

pub mod executor;

pub use executor::{normalized_overall, OrderExecutor};
