//! Currency-tagged amounts.
//!
//! Balances, order quantities and prices all travel as `Money`. Ordering
//! comparisons only look at the amount, so both sides must share a currency;
//! debug builds assert it.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places used when quantities are printed in audit lines
pub const DISPLAY_SCALE: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_ascii_uppercase())
    }

    pub fn btc() -> Self {
        Self::new("BTC")
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub currency: Currency,
    pub amount: Decimal,
}

impl Money {
    pub fn new(currency: Currency, amount: Decimal) -> Self {
        Self { currency, amount }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(currency, Decimal::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_greater_than(&self, other: &Money) -> bool {
        debug_assert_eq!(self.currency, other.currency, "comparing {} with {}", self, other);
        self.amount > other.amount
    }

    pub fn is_less_than(&self, other: &Money) -> bool {
        debug_assert_eq!(self.currency, other.currency, "comparing {} with {}", self, other);
        self.amount < other.amount
    }

    /// Scale by a fractional weight. Non-finite weights scale to zero.
    pub fn multiplied_by(&self, weight: f64) -> Money {
        let factor = Decimal::from_f64(weight).unwrap_or(Decimal::ZERO);
        Money::new(self.currency.clone(), self.amount * factor)
    }

    /// Banker's rounding to `scale` places, used for audit output
    pub fn with_scale(&self, scale: u32) -> Money {
        Money::new(
            self.currency.clone(),
            self.amount
                .round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount.normalize())
    }
}
