//! Resolves detector signals into a single trade action.
//!
//! The policy is a fixed boolean table over up to three detectors. An ADS
//! up-trend looks for a sell and an ADS down-trend for a buy; without ADS an
//! EMA or SMA up-trend also sells. A disabled detector is not the same as a
//! flat one.

use crate::models::signal::{Action, SignalSet, TrendSignal};

fn is(signal: Option<TrendSignal>, expected: TrendSignal) -> bool {
    signal == Some(expected)
}

/// Sell-side condition of the policy table
pub fn favors_sell(signals: &SignalSet) -> bool {
    let SignalSet { ads, ema, sma } = *signals;
    let ads_off = ads.is_none();
    let ema_off = ema.is_none();
    let sma_off = sma.is_none();

    (is(ads, TrendSignal::Up)
        && ((sma_off && (is(ema, TrendSignal::Down) || ema_off))
            || (is(sma, TrendSignal::Down) && (ema_off || is(ema, TrendSignal::Down)))))
        || (ads_off
            && ((is(ema, TrendSignal::Up) && (is(sma, TrendSignal::Down) || sma_off))
                || (ema_off && is(sma, TrendSignal::Up))))
}

/// Buy-side condition of the policy table
pub fn favors_buy(signals: &SignalSet) -> bool {
    let SignalSet { ads, ema, sma } = *signals;
    let ads_off = ads.is_none();
    let ema_off = ema.is_none();
    let sma_off = sma.is_none();

    (is(ads, TrendSignal::Down)
        && ((ema_off && (is(sma, TrendSignal::Up) || sma_off))
            || (is(ema, TrendSignal::Up) && (sma_off || is(sma, TrendSignal::Up)))))
        || (ads_off
            && ((is(ema, TrendSignal::Down) && (is(sma, TrendSignal::Up) || sma_off))
                || (ema_off && is(sma, TrendSignal::Down))))
}

/// Sell is checked first and wins any tie.
pub fn resolve(signals: &SignalSet) -> Action {
    if favors_sell(signals) {
        Action::FavorSell
    } else if favors_buy(signals) {
        Action::FavorBuy
    } else {
        Action::NoAction
    }
}
