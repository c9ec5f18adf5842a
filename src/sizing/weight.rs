//! Position weight from momentum magnitudes.

use serde::{Deserialize, Serialize};

use crate::models::money::Money;

/// Sizing formula selected by the `ALGORITHM` setting.
///
/// `1` selects `Linear`; every other value falls through to `Product`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Algorithm {
    /// `(directional + trend) / ticker_size`, applied to the whole balance
    Linear,
    /// `(directional / ticker_size) * (trend / ticker_size)`, applied to the
    /// lesser of balance and the order maximum
    Product,
}

impl From<i64> for Algorithm {
    fn from(value: i64) -> Self {
        if value == 1 {
            Algorithm::Linear
        } else {
            Algorithm::Product
        }
    }
}

impl From<Algorithm> for i64 {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Linear => 1,
            Algorithm::Product => 2,
        }
    }
}

/// Signed weight before the absolute value and stop-loss ceiling
pub fn raw_weight(algorithm: Algorithm, directional: f64, trend: f64, ticker_size: u32) -> f64 {
    let samples = f64::from(ticker_size);
    match algorithm {
        Algorithm::Linear => (directional + trend) / samples,
        Algorithm::Product => (directional / samples) * (trend / samples),
    }
}

/// Absolute value capped at `max_weight`. NaN collapses to zero.
pub fn clamp_weight(raw: f64, max_weight: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.abs().min(max_weight)
}

/// Amount the weight is applied to
pub fn sizing_base(algorithm: Algorithm, balance: &Money, max_order: &Money) -> Money {
    match algorithm {
        Algorithm::Linear => balance.clone(),
        Algorithm::Product => {
            if balance.is_less_than(max_order) {
                balance.clone()
            } else {
                max_order.clone()
            }
        }
    }
}
