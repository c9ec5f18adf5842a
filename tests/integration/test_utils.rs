//! Shared fixtures: an agent wired to in-memory collaborators

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use trendagent::config::AgentConfig;
use trendagent::core::TrendTradingAgent;
use trendagent::error::{AccountError, ProviderError, TradeError};
use trendagent::models::indicators::{IndicatorSnapshot, Ticker};
use trendagent::models::money::{Currency, Money};
use trendagent::models::order::{MarketOrder, PlSnapshot};
use trendagent::services::{
    AccountService, MarketSnapshotProvider, PaperAccount, SharedControls,
    StaticSnapshotProvider, TradeService,
};
use trendagent::signals::DetectorToggles;
use trendagent::sizing::{Algorithm, OrderLimits, RiskLimits};

pub fn btc(amount: Decimal) -> Money {
    Money::new(Currency::btc(), amount)
}

pub fn usd(amount: Decimal) -> Money {
    Money::new(Currency::new("USD"), amount)
}

/// Limits used throughout: 0.1..5 BTC, 10..1000 USD, stop loss 0.9
pub fn config(algorithm: Algorithm, detectors: DetectorToggles) -> AgentConfig {
    AgentConfig {
        base_currency: Currency::btc(),
        local_currency: Currency::new("USD"),
        limits: RiskLimits {
            base: OrderLimits::new(btc(dec!(0.1)), btc(dec!(5))),
            quote: OrderLimits::new(usd(dec!(10)), usd(dec!(1000))),
            max_weight: 0.9,
        },
        algorithm,
        detectors,
    }
}

pub fn sma_only() -> DetectorToggles {
    DetectorToggles {
        ads: false,
        ema: false,
        sma: true,
    }
}

/// Short SMA above long, bid above VWAP: trend 2, bid 4, ticker size 2
pub fn sell_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot::flat(Currency::new("USD"), usd(dec!(30000)), 2)
        .with_magnitudes(2.0, 4.0, -1.0)
        .with_sma(usd(dec!(30100)), usd(dec!(30000)))
        .with_ticker(Ticker {
            bid: usd(dec!(30010)),
            ask: usd(dec!(30020)),
            last: usd(dec!(30015)),
        })
}

/// Short SMA below long, ask below VWAP: trend -2, ask -1, ticker size 2
pub fn buy_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot::flat(Currency::new("USD"), usd(dec!(30000)), 2)
        .with_magnitudes(-2.0, 1.0, -1.0)
        .with_sma(usd(dec!(29900)), usd(dec!(30000)))
        .with_ticker(Ticker {
            bid: usd(dec!(29980)),
            ask: usd(dec!(29990)),
            last: usd(dec!(29985)),
        })
}

/// Exchange double that records every order and answers with a fixed reply
pub struct RecordingExchange {
    reply: Result<Option<String>, TradeError>,
    pub orders: Mutex<Vec<MarketOrder>>,
    calls: AtomicUsize,
}

impl RecordingExchange {
    pub fn accepting() -> Self {
        Self::replying(Ok(Some("order-1".to_string())))
    }

    pub fn replying(reply: Result<Option<String>, TradeError>) -> Self {
        Self {
            reply,
            orders: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradeService for RecordingExchange {
    async fn place_market_order(&self, order: &MarketOrder) -> Result<Option<String>, TradeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.orders.lock().await.push(order.clone());
        self.reply.clone()
    }
}

/// Account double whose every lookup fails with `error`
pub struct BrokenAccount {
    pub error: AccountError,
}

impl BrokenAccount {
    pub fn new(error: AccountError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl AccountService for BrokenAccount {
    async fn balance(&self, _currency: &Currency) -> Result<Money, AccountError> {
        Err(self.error.clone())
    }

    async fn profit_loss(&self, _currency: &Currency) -> Result<PlSnapshot, AccountError> {
        Err(self.error.clone())
    }

    async fn account_info(&self) -> Result<String, AccountError> {
        Err(self.error.clone())
    }
}

/// Paper account that counts profit/loss lookups
pub struct CountingAccount {
    inner: PaperAccount,
    pl_requests: AtomicUsize,
}

impl CountingAccount {
    pub fn new(inner: PaperAccount) -> Self {
        Self {
            inner,
            pl_requests: AtomicUsize::new(0),
        }
    }

    pub fn pl_requests(&self) -> usize {
        self.pl_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountService for CountingAccount {
    async fn balance(&self, currency: &Currency) -> Result<Money, AccountError> {
        self.inner.balance(currency).await
    }

    async fn profit_loss(&self, currency: &Currency) -> Result<PlSnapshot, AccountError> {
        self.pl_requests.fetch_add(1, Ordering::SeqCst);
        self.inner.profit_loss(currency).await
    }

    async fn account_info(&self) -> Result<String, AccountError> {
        self.inner.account_info().await
    }
}

/// Provider double that panics while armed and can stall before answering
pub struct FaultyProvider {
    snapshot: IndicatorSnapshot,
    panicking: AtomicBool,
    delay: Duration,
    calls: AtomicUsize,
}

impl FaultyProvider {
    pub fn panicking(snapshot: IndicatorSnapshot) -> Self {
        Self {
            snapshot,
            panicking: AtomicBool::new(true),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn slow(snapshot: IndicatorSnapshot, delay: Duration) -> Self {
        Self {
            snapshot,
            panicking: AtomicBool::new(false),
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn recover(&self) {
        self.panicking.store(false, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketSnapshotProvider for FaultyProvider {
    async fn snapshot(&self) -> Result<IndicatorSnapshot, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panicking.load(Ordering::SeqCst) {
            panic!("market data feed crashed");
        }
        tokio::time::sleep(self.delay).await;
        Ok(self.snapshot.clone())
    }
}

/// Live SMA-only agent over a funded paper account, fed by `provider`
pub fn agent_with_provider(
    provider: Arc<dyn MarketSnapshotProvider>,
    exchange: Arc<RecordingExchange>,
) -> Arc<TrendTradingAgent> {
    Arc::new(TrendTradingAgent::new(
        config(Algorithm::Product, sma_only()),
        provider,
        Arc::new(funded_account()),
        exchange,
        Arc::new(SharedControls::new(false, false)),
    ))
}

/// Agent with its collaborators kept at hand for assertions
pub struct TestAgent {
    pub agent: Arc<TrendTradingAgent>,
    pub provider: Arc<StaticSnapshotProvider>,
    pub exchange: Arc<RecordingExchange>,
    pub controls: Arc<SharedControls>,
}

impl TestAgent {
    pub fn new(
        config: AgentConfig,
        snapshot: IndicatorSnapshot,
        account: Arc<dyn AccountService>,
        exchange: RecordingExchange,
        simulation: bool,
    ) -> Self {
        let provider = Arc::new(StaticSnapshotProvider::new(snapshot));
        let exchange = Arc::new(exchange);
        let controls = Arc::new(SharedControls::new(simulation, false));
        let agent = Arc::new(TrendTradingAgent::new(
            config,
            provider.clone(),
            account,
            exchange.clone(),
            controls.clone(),
        ));
        Self {
            agent,
            provider,
            exchange,
            controls,
        }
    }

    /// Live SMA-only agent over a paper account holding 10 BTC and 400 USD
    pub fn live(snapshot: IndicatorSnapshot) -> Self {
        Self::new(
            config(Algorithm::Product, sma_only()),
            snapshot,
            Arc::new(funded_account()),
            RecordingExchange::accepting(),
            false,
        )
    }
}

pub fn funded_account() -> PaperAccount {
    PaperAccount::with_wallets([btc(dec!(10)), usd(dec!(400))])
}
