//! Order-size limits and the stop-loss weight ceiling.

use serde::{Deserialize, Serialize};

use crate::models::money::Money;
use crate::models::order::OrderSide;

/// Bounds on a single order for one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLimits {
    pub min: Money,
    pub max: Money,
}

/// Outcome of fitting a quantity into `OrderLimits`
#[derive(Debug, Clone, PartialEq)]
pub enum Clamp {
    Within(Money),
    /// Quantity exceeded the maximum and was cut down to it
    Reduced(Money),
    BelowMinimum(Money),
}

impl OrderLimits {
    pub fn new(min: Money, max: Money) -> Self {
        Self { min, max }
    }

    pub fn is_consistent(&self) -> bool {
        !self.min.is_greater_than(&self.max)
    }

    /// Cap at `max`, then reject anything under `min`. Applying this to an
    /// already-clamped quantity returns it unchanged.
    pub fn clamp(&self, quantity: Money) -> Clamp {
        let (quantity, reduced) = if quantity.is_greater_than(&self.max) {
            (self.max.clone(), true)
        } else {
            (quantity, false)
        };

        if quantity.is_less_than(&self.min) {
            Clamp::BelowMinimum(quantity)
        } else if reduced {
            Clamp::Reduced(quantity)
        } else {
            Clamp::Within(quantity)
        }
    }
}

/// Risk limits for both sides of the pair.
///
/// `base` bounds sells (quantities in the base asset), `quote` bounds buys
/// (quantities in the local currency).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    pub base: OrderLimits,
    pub quote: OrderLimits,
    /// Stop-loss ceiling on the position weight, in (0, 1]
    pub max_weight: f64,
}

impl RiskLimits {
    pub fn for_side(&self, side: OrderSide) -> &OrderLimits {
        match side {
            OrderSide::Sell => &self.base,
            OrderSide::Buy => &self.quote,
        }
    }
}
