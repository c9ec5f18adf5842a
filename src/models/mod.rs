//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod money;
pub mod order;
pub mod outcome;
pub mod signal;

pub use indicators::{IndicatorSnapshot, Ticker};
pub use money::{Currency, Money};
pub use order::{MarketOrder, OrderIntent, OrderSide, PlSnapshot};
pub use outcome::{Execution, NoOpReason, RunOutcome};
pub use signal::{Action, Detector, SignalSet, TrendSignal};
