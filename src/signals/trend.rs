//! Trend detectors over a single snapshot.

use crate::models::indicators::IndicatorSnapshot;
use crate::models::money::Money;
use crate::models::signal::TrendSignal;

/// Advance/Decline spread: up needs trend and bid momentum both positive,
/// down needs trend and ask momentum both negative.
pub fn detect_ads(snapshot: &IndicatorSnapshot) -> TrendSignal {
    if snapshot.trend_magnitude > 0.0 && snapshot.bid_magnitude > 0.0 {
        TrendSignal::Up
    } else if snapshot.trend_magnitude < 0.0 && snapshot.ask_magnitude < 0.0 {
        TrendSignal::Down
    } else {
        TrendSignal::Flat
    }
}

pub fn detect_ema(snapshot: &IndicatorSnapshot) -> TrendSignal {
    compare_averages(&snapshot.short_ema, &snapshot.long_ema)
}

pub fn detect_sma(snapshot: &IndicatorSnapshot) -> TrendSignal {
    compare_averages(&snapshot.short_sma, &snapshot.long_sma)
}

/// Sign of the trend magnitude alone, as reported in the ADS audit line
pub fn trend_direction(snapshot: &IndicatorSnapshot) -> TrendSignal {
    if snapshot.trend_magnitude > 0.0 {
        TrendSignal::Up
    } else if snapshot.trend_magnitude < 0.0 {
        TrendSignal::Down
    } else {
        TrendSignal::Flat
    }
}

fn compare_averages(short: &Money, long: &Money) -> TrendSignal {
    if short.is_greater_than(long) {
        TrendSignal::Up
    } else if short.is_less_than(long) {
        TrendSignal::Down
    } else {
        TrendSignal::Flat
    }
}
