//! Global switches owned outside the agent.

use std::sync::atomic::{AtomicBool, Ordering};

pub trait TradingControls: Send + Sync {
    /// Log intents instead of sending them to the exchange
    fn is_simulation(&self) -> bool;

    /// Kill switch: suppress trend-following orders regardless of the decision
    fn trend_trading_disabled(&self) -> bool;
}

/// Atomic flags another component (e.g. an arbitrage engine) can flip while
/// the agent is running
#[derive(Debug)]
pub struct SharedControls {
    simulation: AtomicBool,
    trend_trading_disabled: AtomicBool,
}

impl SharedControls {
    pub fn new(simulation: bool, trend_trading_disabled: bool) -> Self {
        Self {
            simulation: AtomicBool::new(simulation),
            trend_trading_disabled: AtomicBool::new(trend_trading_disabled),
        }
    }

    pub fn set_simulation(&self, on: bool) {
        self.simulation.store(on, Ordering::SeqCst);
    }

    pub fn set_trend_trading_disabled(&self, disabled: bool) {
        self.trend_trading_disabled.store(disabled, Ordering::SeqCst);
    }
}

impl Default for SharedControls {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl TradingControls for SharedControls {
    fn is_simulation(&self) -> bool {
        self.simulation.load(Ordering::SeqCst)
    }

    fn trend_trading_disabled(&self) -> bool {
        self.trend_trading_disabled.load(Ordering::SeqCst)
    }
}
