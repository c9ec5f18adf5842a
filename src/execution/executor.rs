//! Order submission and profit/loss reporting.
//!
//! Submission is fire-and-forget: a rejected or failed order is logged and
//! the run ends. Nothing is retried and no local state needs rolling back.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::models::money::{Currency, Money, DISPLAY_SCALE};
use crate::models::order::{MarketOrder, OrderIntent};
use crate::models::outcome::Execution;
use crate::services::account::AccountService;
use crate::services::controls::TradingControls;
use crate::services::exchange::TradeService;

pub struct OrderExecutor {
    trade: Arc<dyn TradeService>,
    account: Arc<dyn AccountService>,
    controls: Arc<dyn TradingControls>,
}

impl OrderExecutor {
    pub fn new(
        trade: Arc<dyn TradeService>,
        account: Arc<dyn AccountService>,
        controls: Arc<dyn TradingControls>,
    ) -> Self {
        Self {
            trade,
            account,
            controls,
        }
    }

    /// Submit `intent` (or simulate it) and report P/L on a live fill.
    /// `last_price` converts base-currency P/L into quote terms.
    pub async fn execute(&self, intent: &OrderIntent, last_price: &Money) -> Execution {
        let order = MarketOrder::from(intent);
        let quantity = intent.quantity.with_scale(DISPLAY_SCALE);

        if self.controls.is_simulation() {
            info!(
                side = %intent.side,
                quantity = %quantity,
                base = %intent.base,
                quote = %intent.quote,
                "You were in simulation mode, the trade below did NOT actually occur."
            );
            info!(
                side = %intent.side,
                "Simulated: {} {} at current market price.",
                intent.side.past_tense(),
                quantity
            );
            return Execution::Simulated;
        }

        let order_ref = match self.trade.place_market_order(&order).await {
            Ok(Some(reference)) if !reference.trim().is_empty() => reference,
            Ok(_) => {
                error!(
                    side = %intent.side,
                    quantity = %quantity,
                    "ERROR: Failed to {} {} at current market price. Please investigate",
                    intent.side,
                    quantity
                );
                return Execution::Failed {
                    reason: "exchange returned no order reference".to_string(),
                };
            }
            Err(e) => {
                error!(
                    side = %intent.side,
                    quantity = %quantity,
                    error = %e,
                    "ERROR: Failed to {} {} at current market price. Please investigate",
                    intent.side,
                    quantity
                );
                return Execution::Failed {
                    reason: e.to_string(),
                };
            }
        };

        info!(order_ref = %order_ref, "Market Order return value: {}", order_ref);
        info!(
            side = %intent.side,
            quantity = %quantity,
            "Successfully {} {} at current market price.",
            intent.side.past_tense(),
            quantity
        );

        let overall_pl = self
            .report_profit_loss(&intent.base, &intent.quote, last_price)
            .await;
        self.report_account_info().await;

        Execution::Filled {
            order_ref,
            overall_pl,
        }
    }

    /// Log base P/L and the overall P/L in quote currency
    async fn report_profit_loss(
        &self,
        base: &Currency,
        quote: &Currency,
        last_price: &Money,
    ) -> Option<Decimal> {
        let quote_pl = self.account.profit_loss(quote).await;
        let base_pl = self.account.profit_loss(base).await;

        let (quote_pl, base_pl) = match (quote_pl, base_pl) {
            (Ok(q), Ok(b)) => (q, b),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Could not fetch profit/loss after order: {}", e);
                return None;
            }
        };

        info!(
            amount = %base_pl.amount,
            percent = base_pl.percent,
            "Current P/L: {} | {}%",
            base_pl.amount,
            base_pl.percent
        );

        let Some(overall) = normalized_overall(&quote_pl.amount, &base_pl.amount, last_price)
        else {
            warn!(
                quote_pl = %quote_pl.amount,
                base_pl = %base_pl.amount,
                last = %last_price,
                "Overall P/L overflowed, skipping report"
            );
            return None;
        };
        info!(
            overall = %overall,
            currency = %quote,
            "Overall P/L: {} {}",
            overall.normalize(),
            quote
        );
        Some(overall)
    }

    async fn report_account_info(&self) {
        match self.account.account_info().await {
            Ok(details) => info!("{}", details),
            Err(e) => warn!(error = %e, "Could not fetch account info: {}", e),
        }
    }
}

/// Quote P/L plus base P/L valued at the last traded price. `None` on overflow.
pub fn normalized_overall(
    quote_pl: &Money,
    base_pl: &Money,
    last_price: &Money,
) -> Option<Decimal> {
    base_pl
        .amount
        .checked_mul(last_price.amount)
        .and_then(|base_in_quote| quote_pl.amount.checked_add(base_in_quote))
}
