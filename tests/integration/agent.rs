//! Integration tests for a full agent run
//!
//! Snapshot provider, account and exchange are in-memory doubles.

use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

use trendagent::error::{AccountError, AgentError, TradeError};
use trendagent::models::money::Currency;
use trendagent::models::order::{OrderSide, PlSnapshot};
use trendagent::models::outcome::{Execution, NoOpReason, RunOutcome};
use trendagent::models::signal::Action;
use trendagent::services::{PaperAccount, StaticSnapshotProvider};
use trendagent::signals::DetectorToggles;
use trendagent::sizing::Algorithm;

use super::test_utils::{
    btc, buy_snapshot, config, funded_account, sell_snapshot, sma_only, usd, BrokenAccount,
    CountingAccount, RecordingExchange, TestAgent,
};

#[tokio::test]
async fn product_sell_sizes_four_and_a_half_btc() {
    let app = TestAgent::live(sell_snapshot());

    let outcome = assert_ok!(app.agent.run().await);
    assert_eq!(outcome.action(), Action::FavorSell);
    let intent = outcome.intent().expect("order intent");
    assert_eq!(intent.side, OrderSide::Sell);
    assert_eq!(intent.quantity, btc(dec!(4.5)));
    assert_eq!(intent.base, Currency::btc());
    assert_eq!(intent.quote, Currency::new("USD"));

    let orders = app.exchange.orders.lock().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].side, OrderSide::Sell);
    assert_eq!(orders[0].quantity, dec!(4.5));
}

#[tokio::test]
async fn buy_is_sized_from_quote_balance() {
    let app = TestAgent::live(buy_snapshot());

    let outcome = assert_ok!(app.agent.run().await);
    assert_eq!(outcome.action(), Action::FavorBuy);
    let intent = outcome.intent().expect("order intent");
    assert_eq!(intent.side, OrderSide::Buy);
    assert_eq!(intent.quantity, usd(dec!(200)));
}

#[tokio::test]
async fn live_fill_reports_overall_profit_loss() {
    let account = Arc::new(funded_account());
    account
        .set_profit_loss(PlSnapshot {
            amount: usd(dec!(-25)),
            percent: -0.5,
        })
        .await;
    account
        .set_profit_loss(PlSnapshot {
            amount: btc(dec!(0.01)),
            percent: 1.0,
        })
        .await;
    let app = TestAgent::new(
        config(Algorithm::Product, sma_only()),
        sell_snapshot(),
        account,
        RecordingExchange::accepting(),
        false,
    );

    match assert_ok!(app.agent.run().await) {
        RunOutcome::Order { execution, .. } => assert_eq!(
            execution,
            Execution::Filled {
                order_ref: "order-1".to_string(),
                // -25 + 0.01 * 30015
                overall_pl: Some(dec!(275.15)),
            }
        ),
        other => panic!("expected an order, got {:?}", other),
    }
}

#[tokio::test]
async fn simulation_never_reaches_the_exchange() {
    let app = TestAgent::new(
        config(Algorithm::Product, sma_only()),
        sell_snapshot(),
        Arc::new(funded_account()),
        RecordingExchange::accepting(),
        true,
    );

    let outcome = assert_ok!(app.agent.run().await);
    match outcome {
        RunOutcome::Order {
            intent, execution, ..
        } => {
            assert_eq!(intent.quantity, btc(dec!(4.5)));
            assert_eq!(execution, Execution::Simulated);
        }
        other => panic!("expected a simulated order, got {:?}", other),
    }
    assert_eq!(app.exchange.calls(), 0);
}

#[tokio::test]
async fn profit_loss_is_only_reported_for_live_fills() {
    for (simulation, expected_requests) in [(true, 0), (false, 2)] {
        let account = Arc::new(CountingAccount::new(funded_account()));
        let app = TestAgent::new(
            config(Algorithm::Product, sma_only()),
            sell_snapshot(),
            account.clone(),
            RecordingExchange::accepting(),
            simulation,
        );

        let outcome = assert_ok!(app.agent.run().await);
        assert!(outcome.intent().is_some());
        assert_eq!(account.pl_requests(), expected_requests);
    }
}

#[tokio::test]
async fn kill_switch_stops_sized_order() {
    let app = TestAgent::live(sell_snapshot());
    app.controls.set_trend_trading_disabled(true);

    let outcome = assert_ok!(app.agent.run().await);
    assert_eq!(
        outcome,
        RunOutcome::NoOp {
            action: Action::FavorSell,
            reason: NoOpReason::TrendTradingDisabled,
        }
    );
    assert_eq!(app.exchange.calls(), 0);

    app.controls.set_trend_trading_disabled(false);
    let outcome = assert_ok!(app.agent.run().await);
    assert!(outcome.intent().is_some());
    assert_eq!(app.exchange.calls(), 1);
}

#[tokio::test]
async fn small_balance_is_below_minimum() {
    let app = TestAgent::new(
        config(Algorithm::Product, sma_only()),
        sell_snapshot(),
        Arc::new(PaperAccount::with_wallets([btc(dec!(0.1)), usd(dec!(400))])),
        RecordingExchange::accepting(),
        false,
    );

    // 0.1 * 0.9 = 0.09 BTC, under the 0.1 minimum
    let outcome = assert_ok!(app.agent.run().await);
    assert_eq!(
        outcome,
        RunOutcome::NoOp {
            action: Action::FavorSell,
            reason: NoOpReason::BelowMinimum,
        }
    );
    assert_eq!(app.exchange.calls(), 0);
}

#[tokio::test]
async fn empty_wallet_is_a_noop() {
    let app = TestAgent::new(
        config(Algorithm::Linear, sma_only()),
        sell_snapshot(),
        Arc::new(PaperAccount::with_wallets([btc(dec!(0)), usd(dec!(400))])),
        RecordingExchange::accepting(),
        false,
    );

    let outcome = assert_ok!(app.agent.run().await);
    assert_eq!(
        outcome,
        RunOutcome::NoOp {
            action: Action::FavorSell,
            reason: NoOpReason::EmptyBalance,
        }
    );
}

#[tokio::test]
async fn bid_at_vwap_is_unfavourable() {
    let mut snapshot = sell_snapshot();
    snapshot.ticker.bid = snapshot.vwap.clone();
    let app = TestAgent::live(snapshot);

    let outcome = assert_ok!(app.agent.run().await);
    assert_eq!(
        outcome,
        RunOutcome::NoOp {
            action: Action::FavorSell,
            reason: NoOpReason::UnfavourablePrice,
        }
    );
}

#[tokio::test]
async fn unfavourable_price_skips_the_balance_lookup() {
    let mut snapshot = sell_snapshot();
    snapshot.ticker.bid = usd(dec!(29000));
    // Would be fatal if the balance were fetched
    let app = TestAgent::new(
        config(Algorithm::Product, sma_only()),
        snapshot,
        Arc::new(PaperAccount::new()),
        RecordingExchange::accepting(),
        false,
    );

    let outcome = assert_ok!(app.agent.run().await);
    assert_eq!(
        outcome,
        RunOutcome::NoOp {
            action: Action::FavorSell,
            reason: NoOpReason::UnfavourablePrice,
        }
    );
}

#[tokio::test]
async fn no_enabled_detector_takes_no_action() {
    let app = TestAgent::new(
        config(Algorithm::Product, DetectorToggles::default()),
        sell_snapshot(),
        Arc::new(funded_account()),
        RecordingExchange::accepting(),
        false,
    );

    let outcome = assert_ok!(app.agent.run().await);
    assert_eq!(
        outcome,
        RunOutcome::NoOp {
            action: Action::NoAction,
            reason: NoOpReason::NoAction,
        }
    );
    assert_eq!(app.exchange.calls(), 0);
}

#[tokio::test]
async fn missing_wallet_is_fatal() {
    let app = TestAgent::new(
        config(Algorithm::Product, sma_only()),
        sell_snapshot(),
        Arc::new(PaperAccount::with_wallets([usd(dec!(400))])),
        RecordingExchange::accepting(),
        false,
    );

    let err = assert_err!(app.agent.run().await);
    assert!(err.is_fatal());
    assert!(matches!(err, AgentError::WalletNotFound(ref c) if *c == Currency::btc()));
    assert_eq!(app.exchange.calls(), 0);
}

#[tokio::test]
async fn unavailable_account_is_not_fatal() {
    let app = TestAgent::new(
        config(Algorithm::Product, sma_only()),
        buy_snapshot(),
        Arc::new(BrokenAccount::new(AccountError::Unavailable(
            "timeout".to_string(),
        ))),
        RecordingExchange::accepting(),
        false,
    );

    let outcome = assert_ok!(app.agent.run().await);
    assert_eq!(
        outcome,
        RunOutcome::NoOp {
            action: Action::FavorBuy,
            reason: NoOpReason::BalanceUnavailable,
        }
    );
}

#[tokio::test]
async fn empty_order_reference_is_a_failure() {
    for reply in [
        Ok(None),
        Ok(Some("  ".to_string())),
        Err(TradeError::Rejected("insufficient funds".to_string())),
    ] {
        let app = TestAgent::new(
            config(Algorithm::Product, sma_only()),
            sell_snapshot(),
            Arc::new(funded_account()),
            RecordingExchange::replying(reply),
            false,
        );

        match assert_ok!(app.agent.run().await) {
            RunOutcome::Order { execution, .. } => {
                assert!(!execution.is_success());
                assert!(matches!(execution, Execution::Failed { .. }));
            }
            other => panic!("expected a failed order, got {:?}", other),
        }
        assert_eq!(app.exchange.calls(), 1);
    }
}

#[tokio::test]
async fn missing_snapshot_is_an_error() {
    let app = TestAgent::live(sell_snapshot());
    let empty = Arc::new(StaticSnapshotProvider::empty());
    let agent = trendagent::core::TrendTradingAgent::new(
        config(Algorithm::Product, sma_only()),
        empty,
        Arc::new(funded_account()),
        app.exchange.clone(),
        app.controls.clone(),
    );

    let err = assert_err!(agent.run().await);
    assert!(!err.is_fatal());
    assert!(matches!(err, AgentError::Provider(_)));
}

#[tokio::test]
async fn zero_ticker_size_is_rejected() {
    let app = TestAgent::live(sell_snapshot());
    let mut broken = sell_snapshot();
    broken.ticker_size = 0;
    app.provider.set(broken).await;

    let err = assert_err!(app.agent.run().await);
    assert!(matches!(err, AgentError::Provider(_)));
    assert_eq!(app.exchange.calls(), 0);
}

#[tokio::test]
async fn decide_is_repeatable() {
    let app = TestAgent::live(sell_snapshot());
    let snapshot = sell_snapshot();
    let first = app.agent.decide(&snapshot);
    let second = app.agent.decide(&snapshot);
    assert_eq!(first, second);
    assert_eq!(first.1, Action::FavorSell);
}
