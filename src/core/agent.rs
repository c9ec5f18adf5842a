//! Trend-following trading agent.
//!
//! One `run` is one sequential pass: read the snapshot, aggregate the enabled
//! detectors, resolve an action, size the order and hand it to the executor.
//! Only the configuration outlives a run.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::AgentConfig;
use crate::error::{AccountError, AgentError, ProviderError};
use crate::execution::OrderExecutor;
use crate::models::indicators::IndicatorSnapshot;
use crate::models::money::DISPLAY_SCALE;
use crate::models::order::{OrderIntent, OrderSide};
use crate::models::outcome::{NoOpReason, RunOutcome};
use crate::models::signal::{Action, SignalSet};
use crate::services::account::AccountService;
use crate::services::controls::TradingControls;
use crate::services::exchange::TradeService;
use crate::services::market_data::MarketSnapshotProvider;
use crate::signals::aggregation::Aggregator;
use crate::signals::decision::resolve;
use crate::sizing::PositionSizer;

pub struct TrendTradingAgent {
    config: AgentConfig,
    provider: Arc<dyn MarketSnapshotProvider>,
    account: Arc<dyn AccountService>,
    controls: Arc<dyn TradingControls>,
    sizer: PositionSizer,
    executor: OrderExecutor,
}

enum Sizing {
    Order(OrderIntent),
    Skip(NoOpReason),
}

impl TrendTradingAgent {
    pub fn new(
        config: AgentConfig,
        provider: Arc<dyn MarketSnapshotProvider>,
        account: Arc<dyn AccountService>,
        trade: Arc<dyn TradeService>,
        controls: Arc<dyn TradingControls>,
    ) -> Self {
        let sizer = PositionSizer::new(config.algorithm, config.limits.clone());
        let executor = OrderExecutor::new(trade, account.clone(), controls.clone());
        Self {
            config,
            provider,
            account,
            controls,
            sizer,
            executor,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Detector signals and the resolved action for `snapshot`
    pub fn decide(&self, snapshot: &IndicatorSnapshot) -> (SignalSet, Action) {
        let signals = Aggregator::aggregate(snapshot, self.config.detectors);
        (signals, resolve(&signals))
    }

    /// Run the pipeline once.
    ///
    /// Unfavourable conditions come back as `RunOutcome::NoOp`. An error means
    /// the run could not complete; `AgentError::WalletNotFound` should stop
    /// the agent until an operator intervenes.
    pub async fn run(&self) -> Result<RunOutcome, AgentError> {
        let snapshot = self.provider.snapshot().await?;
        snapshot.validate().map_err(ProviderError::InvalidSnapshot)?;
        self.log_snapshot(&snapshot);

        let (signals, action) = self.decide(&snapshot);
        debug!(signals = ?signals, action = ?action, "Resolved action {:?}", action);

        let side = match action {
            Action::FavorSell => OrderSide::Sell,
            Action::FavorBuy => OrderSide::Buy,
            Action::NoAction => {
                info!(
                    "Trend following trading agent has decided no {} action will be taken at this time.",
                    self.config.local_currency
                );
                return Ok(RunOutcome::NoOp {
                    action,
                    reason: NoOpReason::NoAction,
                });
            }
        };

        let intent = match self.size_order(side, &snapshot).await? {
            Sizing::Order(intent) => intent,
            Sizing::Skip(reason) => return Ok(RunOutcome::NoOp { action, reason }),
        };

        if self.controls.trend_trading_disabled() {
            info!(
                side = %intent.side,
                quantity = %intent.quantity,
                "Trend following trades disabled by Arbitrage Engine."
            );
            return Ok(RunOutcome::NoOp {
                action,
                reason: NoOpReason::TrendTradingDisabled,
            });
        }

        let execution = self.executor.execute(&intent, &snapshot.ticker.last).await;
        Ok(RunOutcome::Order {
            action,
            intent,
            execution,
        })
    }

    async fn size_order(
        &self,
        side: OrderSide,
        snapshot: &IndicatorSnapshot,
    ) -> Result<Sizing, AgentError> {
        let weight = match self.sizer.precheck(side, snapshot) {
            Ok(weight) => weight,
            Err(reason) => return Ok(Sizing::Skip(reason)),
        };

        let currency = match side {
            OrderSide::Sell => &self.config.base_currency,
            OrderSide::Buy => &self.config.local_currency,
        };
        let balance = match self.account.balance(currency).await {
            Ok(balance) => balance,
            Err(AccountError::WalletNotFound(currency)) => {
                error!(currency = %currency, "ERROR: Could not find wallet for {}", currency);
                return Err(AgentError::WalletNotFound(currency));
            }
            Err(e) => {
                info!(
                    error = %e,
                    "Could not determine wallet balance at this time, order will not be processed."
                );
                return Ok(Sizing::Skip(NoOpReason::BalanceUnavailable));
            }
        };

        Ok(match self.sizer.quantity(side, &balance, weight) {
            Ok(quantity) => Sizing::Order(OrderIntent {
                side,
                quantity,
                base: self.config.base_currency.clone(),
                quote: self.config.local_currency.clone(),
            }),
            Err(reason) => Sizing::Skip(reason),
        })
    }

    fn log_snapshot(&self, snapshot: &IndicatorSnapshot) {
        info!(
            ticker_size = snapshot.ticker_size,
            trend = snapshot.trend_magnitude,
            bid = snapshot.bid_magnitude,
            ask = snapshot.ask_magnitude,
            vwap = %snapshot.vwap,
            "Ticker Size: {} | Trend Arrow: {} | Bid Arrow: {} | Ask Arrow: {} | VWAP: {}",
            snapshot.ticker_size,
            snapshot.trend_magnitude,
            snapshot.bid_magnitude,
            snapshot.ask_magnitude,
            snapshot.vwap
        );
        info!(
            "Long EMA: {} | Short EMA: {} | Long SMA: {} | Short SMA: {}",
            snapshot.long_ema.with_scale(DISPLAY_SCALE),
            snapshot.short_ema.with_scale(DISPLAY_SCALE),
            snapshot.long_sma,
            snapshot.short_sma
        );
    }
}
