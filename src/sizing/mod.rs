//! Position sizing under the configured risk limits.

pub mod limits;
pub mod sizer;
pub mod weight;

pub use limits::{Clamp, OrderLimits, RiskLimits};
pub use sizer::PositionSizer;
pub use weight::{clamp_weight, raw_weight, Algorithm};
