//! Agent configuration loaded from the environment (`.env` supported).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

use crate::error::ConfigError;
use crate::models::money::{Currency, Money};
use crate::signals::aggregation::DetectorToggles;
use crate::sizing::limits::{OrderLimits, RiskLimits};
use crate::sizing::weight::Algorithm;

pub const DEFAULT_EVAL_INTERVAL_SECONDS: u64 = 60;
pub const DEFAULT_PORT: u16 = 8080;

/// Deployment environment (`APP_ENV`), `sandbox` unless set
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn get_eval_interval() -> u64 {
    env::var("EVAL_INTERVAL_SECONDS")
        .ok()
        .and_then(|i| i.parse().ok())
        .unwrap_or(DEFAULT_EVAL_INTERVAL_SECONDS)
}

pub fn get_snapshot_path() -> Option<PathBuf> {
    env::var("SNAPSHOT_PATH").ok().map(PathBuf::from)
}

/// Opening paper balances (`PAPER_BASE_BALANCE`, `PAPER_LOCAL_BALANCE`).
/// Unset or unparsable values open an empty wallet.
pub fn paper_wallets<F>(config: &AgentConfig, lookup: F) -> Vec<Money>
where
    F: Fn(&str) -> Option<String>,
{
    [
        ("PAPER_BASE_BALANCE", &config.base_currency),
        ("PAPER_LOCAL_BALANCE", &config.local_currency),
    ]
    .into_iter()
    .map(|(key, currency)| {
        let amount = lookup(key)
            .and_then(|raw| Decimal::from_str(raw.trim()).ok())
            .filter(|amount| !amount.is_sign_negative())
            .unwrap_or(Decimal::ZERO);
        Money::new(currency.clone(), amount)
    })
    .collect()
}

/// Immutable trading configuration, read once at start-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub base_currency: Currency,
    pub local_currency: Currency,
    pub limits: RiskLimits,
    pub algorithm: Algorithm,
    pub detectors: DetectorToggles,
}

/// Initial state of the runtime switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSettings {
    pub simulation: bool,
    pub trend_trading_disabled: bool,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes `std::env::var`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_currency = lookup("BASE_CURRENCY")
            .map(Currency::new)
            .unwrap_or_else(Currency::btc);
        let local_currency = lookup("LOCAL_CURRENCY")
            .map(Currency::new)
            .unwrap_or_else(|| Currency::new("USD"));

        let base = OrderLimits::new(
            read_money(&lookup, "MIN_BTC", &base_currency)?,
            read_money(&lookup, "MAX_BTC", &base_currency)?,
        );
        let quote = OrderLimits::new(
            read_money(&lookup, "MIN_LOCAL", &local_currency)?,
            read_money(&lookup, "MAX_LOCAL", &local_currency)?,
        );
        for (name, limits) in [("BTC", &base), ("local", &quote)] {
            if !limits.is_consistent() {
                warn!(
                    min = %limits.min,
                    max = %limits.max,
                    "Configured {} minimum {} is above the maximum {}",
                    name,
                    limits.min,
                    limits.max
                );
            }
        }

        let max_weight = read_required(&lookup, "MAX_LOSS")?;
        let max_weight: f64 = parse(&max_weight, "MAX_LOSS")?;
        if !(max_weight > 0.0 && max_weight <= 1.0) {
            return Err(invalid("MAX_LOSS", max_weight.to_string()));
        }

        let algorithm = read_required(&lookup, "ALGORITHM")?;
        let algorithm = Algorithm::from(parse::<i64>(&algorithm, "ALGORITHM")?);

        let detectors = DetectorToggles {
            ads: flag(&lookup, "USE_ADS"),
            ema: flag(&lookup, "USE_EMA"),
            sma: flag(&lookup, "USE_SMA"),
        };

        Ok(Self {
            base_currency,
            local_currency,
            limits: RiskLimits {
                base,
                quote,
                max_weight,
            },
            algorithm,
            detectors,
        })
    }
}

impl ControlSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Simulation stays on unless `SIM_MODE=0`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            simulation: lookup("SIM_MODE")
                .map(|v| v.trim() != "0")
                .unwrap_or(true),
            trend_trading_disabled: flag(&lookup, "DISABLE_TREND_TRADE"),
        }
    }
}

/// Detector flags are on only when set to exactly "1"
fn flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim() == "1").unwrap_or(false)
}

fn read_required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn read_money<F>(lookup: &F, key: &str, currency: &Currency) -> Result<Money, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = read_required(lookup, key)?;
    let amount = Decimal::from_str(raw.trim()).map_err(|_| invalid(key, raw.clone()))?;
    if amount.is_sign_negative() {
        return Err(invalid(key, raw));
    }
    Ok(Money::new(currency.clone(), amount))
}

fn parse<T: FromStr>(raw: &str, key: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| invalid(key, raw.to_string()))
}

fn invalid(key: &str, value: String) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value,
    }
}
