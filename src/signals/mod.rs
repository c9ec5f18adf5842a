//! Signal evaluation: trend detectors, aggregation and the decision policy.

pub mod aggregation;
pub mod decision;
pub mod trend;

pub use aggregation::*;
pub use decision::*;
pub use trend::*;
