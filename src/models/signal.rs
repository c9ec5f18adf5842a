use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction inferred by a single trend detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendSignal {
    Up,
    Down,
    Flat,
}

impl fmt::Display for TrendSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendSignal::Up => f.write_str("up"),
            TrendSignal::Down => f.write_str("down"),
            TrendSignal::Flat => f.write_str("flat"),
        }
    }
}

/// The three trend detectors the agent can combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Detector {
    /// Advance/Decline spread
    Ads,
    Ema,
    Sma,
}

impl Detector {
    pub fn label(self) -> &'static str {
        match self {
            Detector::Ads => "Advance/Decline spread",
            Detector::Ema => "EMA",
            Detector::Sma => "SMA",
        }
    }
}

/// Per-run detector outputs. `None` means the detector is disabled, which the
/// resolver treats differently from `Some(Flat)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    pub ads: Option<TrendSignal>,
    pub ema: Option<TrendSignal>,
    pub sma: Option<TrendSignal>,
}

impl SignalSet {
    pub fn new(
        ads: Option<TrendSignal>,
        ema: Option<TrendSignal>,
        sma: Option<TrendSignal>,
    ) -> Self {
        Self { ads, ema, sma }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    FavorSell,
    FavorBuy,
    NoAction,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::FavorSell => "favor_sell",
            Action::FavorBuy => "favor_buy",
            Action::NoAction => "no_action",
        }
    }
}
