//! Collects the enabled detectors into a `SignalSet`

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::indicators::IndicatorSnapshot;
use crate::models::signal::{Detector, SignalSet, TrendSignal};
use crate::signals::trend::{detect_ads, detect_ema, detect_sma, trend_direction};

/// Which detectors take part in the decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorToggles {
    pub ads: bool,
    pub ema: bool,
    pub sma: bool,
}

impl DetectorToggles {
    pub fn all() -> Self {
        Self {
            ads: true,
            ema: true,
            sma: true,
        }
    }
}

pub struct Aggregator;

impl Aggregator {
    /// Evaluate every enabled detector. Disabled ones stay `None` and are not
    /// evaluated at all.
    pub fn aggregate(snapshot: &IndicatorSnapshot, toggles: DetectorToggles) -> SignalSet {
        let ads = toggles.ads.then(|| {
            let signal = detect_ads(snapshot);
            Self::report(snapshot, Detector::Ads, trend_direction(snapshot));
            signal
        });
        let ema = toggles.ema.then(|| {
            let signal = detect_ema(snapshot);
            Self::report(snapshot, Detector::Ema, signal);
            signal
        });
        let sma = toggles.sma.then(|| {
            let signal = detect_sma(snapshot);
            Self::report(snapshot, Detector::Sma, signal);
            signal
        });

        SignalSet::new(ads, ema, sma)
    }

    fn report(snapshot: &IndicatorSnapshot, detector: Detector, direction: TrendSignal) {
        let currency = &snapshot.vwap.currency;
        info!(
            detector = ?detector,
            direction = %direction,
            currency = %currency,
            "{} has determined that the {} market is trending {}.",
            detector.label(),
            currency,
            direction
        );
    }
}
