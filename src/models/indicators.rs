use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::money::{Currency, Money};

/// Latest quote for the traded pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub bid: Money,
    pub ask: Money,
    pub last: Money,
}

/// Indicator values for one agent run.
///
/// Produced upstream (streaming ticker manager) and treated as read-only for
/// the whole run. Magnitudes are signed momentum readings over the last
/// `ticker_size` samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub trend_magnitude: f64,
    pub bid_magnitude: f64,
    pub ask_magnitude: f64,
    pub vwap: Money,
    pub short_ema: Money,
    pub long_ema: Money,
    pub short_sma: Money,
    pub long_sma: Money,
    pub ticker_size: u32,
    pub ticker: Ticker,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl IndicatorSnapshot {
    /// Snapshot with neutral momentum and every price set to `price`
    pub fn flat(currency: Currency, price: Money, ticker_size: u32) -> Self {
        debug_assert_eq!(currency, price.currency);
        Self {
            trend_magnitude: 0.0,
            bid_magnitude: 0.0,
            ask_magnitude: 0.0,
            vwap: price.clone(),
            short_ema: price.clone(),
            long_ema: price.clone(),
            short_sma: price.clone(),
            long_sma: price.clone(),
            ticker_size,
            ticker: Ticker {
                bid: price.clone(),
                ask: price.clone(),
                last: price,
            },
            timestamp: Utc::now(),
        }
    }

    pub fn with_magnitudes(mut self, trend: f64, bid: f64, ask: f64) -> Self {
        self.trend_magnitude = trend;
        self.bid_magnitude = bid;
        self.ask_magnitude = ask;
        self
    }

    pub fn with_ema(mut self, short: Money, long: Money) -> Self {
        self.short_ema = short;
        self.long_ema = long;
        self
    }

    pub fn with_sma(mut self, short: Money, long: Money) -> Self {
        self.short_sma = short;
        self.long_sma = long;
        self
    }

    pub fn with_vwap(mut self, vwap: Money) -> Self {
        self.vwap = vwap;
        self
    }

    pub fn with_ticker(mut self, ticker: Ticker) -> Self {
        self.ticker = ticker;
        self
    }

    /// Reject snapshots the sizing formulas cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.ticker_size == 0 {
            return Err("ticker size must be positive".to_string());
        }
        let magnitudes = [self.trend_magnitude, self.bid_magnitude, self.ask_magnitude];
        if magnitudes.iter().any(|m| m.is_nan()) {
            return Err("momentum magnitudes must be numbers".to_string());
        }
        Ok(())
    }
}
