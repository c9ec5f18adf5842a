//! Order sizing for both sides of the pair.
//!
//! Sizing is split around the balance lookup so the caller can skip the
//! account call whenever the price check already rules the trade out:
//! `precheck` (price vs VWAP, weight) runs first, `quantity` runs once the
//! balance is known.

use tracing::{debug, info};

use crate::models::indicators::IndicatorSnapshot;
use crate::models::money::{Money, DISPLAY_SCALE};
use crate::models::order::OrderSide;
use crate::models::outcome::NoOpReason;
use crate::sizing::limits::{Clamp, RiskLimits};
use crate::sizing::weight::{clamp_weight, raw_weight, sizing_base, Algorithm};

#[derive(Debug, Clone)]
pub struct PositionSizer {
    algorithm: Algorithm,
    limits: RiskLimits,
}

impl PositionSizer {
    pub fn new(algorithm: Algorithm, limits: RiskLimits) -> Self {
        Self { algorithm, limits }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Sell only while the bid is above VWAP, buy only while the ask is below it
    pub fn is_favourable(side: OrderSide, snapshot: &IndicatorSnapshot) -> bool {
        match side {
            OrderSide::Sell => snapshot.ticker.bid.is_greater_than(&snapshot.vwap),
            OrderSide::Buy => snapshot.ticker.ask.is_less_than(&snapshot.vwap),
        }
    }

    /// Stop-loss-clamped weight for `side`
    pub fn weight(&self, side: OrderSide, snapshot: &IndicatorSnapshot) -> f64 {
        let directional = match side {
            OrderSide::Sell => snapshot.bid_magnitude,
            OrderSide::Buy => snapshot.ask_magnitude,
        };
        let raw = raw_weight(
            self.algorithm,
            directional,
            snapshot.trend_magnitude,
            snapshot.ticker_size,
        );

        // Sells report the signed weight, buys the absolute one.
        let reported = match side {
            OrderSide::Sell => raw,
            OrderSide::Buy => raw.abs(),
        };
        info!(side = %side, weight = reported, "Calculated weight is {}", reported);

        let weight = clamp_weight(raw, self.limits.max_weight);
        if raw.abs() > self.limits.max_weight {
            info!(
                side = %side,
                max_weight = self.limits.max_weight,
                "Weight is above stop loss value, limiting weight to {}",
                self.limits.max_weight
            );
        }
        weight
    }

    /// Price check followed by the weight, or the reason to stand aside
    pub fn precheck(
        &self,
        side: OrderSide,
        snapshot: &IndicatorSnapshot,
    ) -> Result<f64, NoOpReason> {
        if !Self::is_favourable(side, snapshot) {
            let currency = &snapshot.vwap.currency;
            match side {
                OrderSide::Sell => {
                    info!(
                        bid = %snapshot.ticker.bid,
                        vwap = %snapshot.vwap,
                        "Current bid price of {} is below the VWAP of {}",
                        snapshot.ticker.bid,
                        snapshot.vwap
                    );
                    info!(
                        "Trend following trade agent has determined that {} market conditions are not favourable for you to sell at this time.",
                        currency
                    );
                }
                OrderSide::Buy => {
                    info!(
                        ask = %snapshot.ticker.ask,
                        vwap = %snapshot.vwap,
                        "Current ask price of {} is above the VWAP of {}",
                        snapshot.ticker.ask,
                        snapshot.vwap
                    );
                    info!(
                        "The trading agent has determined that {} market conditions are not favourable for you to buy at this time.",
                        currency
                    );
                }
            }
            return Err(NoOpReason::UnfavourablePrice);
        }

        Ok(self.weight(side, snapshot))
    }

    /// Order quantity for `balance` at `weight`, clamped to the side's limits
    pub fn quantity(
        &self,
        side: OrderSide,
        balance: &Money,
        weight: f64,
    ) -> Result<Money, NoOpReason> {
        let limits = self.limits.for_side(side);
        debug!(
            side = %side,
            balance = %balance,
            max = %limits.max,
            min = %limits.min,
            "Balance {} | max order {} | min order {}",
            balance,
            limits.max,
            limits.min
        );

        if balance.is_zero() {
            info!(
                side = %side,
                currency = %balance.currency,
                "{} balance is empty. No further {} orders are possible until the market corrects or funds are added to your account.",
                balance.currency,
                side
            );
            return Err(NoOpReason::EmptyBalance);
        }

        let quantity = sizing_base(self.algorithm, balance, &limits.max).multiplied_by(weight);
        info!(
            side = %side,
            quantity = %quantity.with_scale(DISPLAY_SCALE),
            available = %balance,
            "Trend following trade agent is attempting to {} {} of {} available",
            side,
            quantity.with_scale(DISPLAY_SCALE),
            balance
        );

        match limits.clamp(quantity.clone()) {
            Clamp::Within(quantity) => Ok(quantity),
            Clamp::Reduced(reduced) => {
                info!(
                    side = %side,
                    "{} was more than the configured maximum of {}. Reducing order size to {}",
                    quantity.with_scale(DISPLAY_SCALE),
                    limits.max,
                    reduced
                );
                Ok(reduced)
            }
            Clamp::BelowMinimum(quantity) => {
                info!(
                    side = %side,
                    "{} was less than the configured minimum of {}",
                    quantity.with_scale(DISPLAY_SCALE),
                    limits.min
                );
                info!(
                    "Trend following trade agent has decided that there is not enough {} momentum to trade at this time.",
                    limits.min.currency
                );
                Err(NoOpReason::BelowMinimum)
            }
        }
    }
}
