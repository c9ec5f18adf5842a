use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::money::{Currency, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Past tense used in fill reports
    pub fn past_tense(self) -> &'static str {
        match self {
            OrderSide::Buy => "bought",
            OrderSide::Sell => "sold",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => f.write_str("buy"),
            OrderSide::Sell => f.write_str("sell"),
        }
    }
}

/// A sized order the agent wants to place.
///
/// Only built once the quantity has cleared the configured minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub side: OrderSide,
    pub quantity: Money,
    pub base: Currency,
    pub quote: Currency,
}

/// Market order as handed to the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOrder {
    pub side: OrderSide,
    pub quantity: rust_decimal::Decimal,
    pub base: Currency,
    pub quote: Currency,
}

impl From<&OrderIntent> for MarketOrder {
    fn from(intent: &OrderIntent) -> Self {
        Self {
            side: intent.side,
            quantity: intent.quantity.amount,
            base: intent.base.clone(),
            quote: intent.quote.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlSnapshot {
    pub amount: Money,
    pub percent: f64,
}
