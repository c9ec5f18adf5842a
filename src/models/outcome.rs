use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::order::OrderIntent;
use crate::models::signal::Action;

/// Why a run ended without touching the exchange. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    NoAction,
    UnfavourablePrice,
    BalanceUnavailable,
    EmptyBalance,
    BelowMinimum,
    TrendTradingDisabled,
}

impl NoOpReason {
    pub fn as_str(self) -> &'static str {
        match self {
            NoOpReason::NoAction => "no_action",
            NoOpReason::UnfavourablePrice => "unfavourable_price",
            NoOpReason::BalanceUnavailable => "balance_unavailable",
            NoOpReason::EmptyBalance => "empty_balance",
            NoOpReason::BelowMinimum => "below_minimum",
            NoOpReason::TrendTradingDisabled => "trend_trading_disabled",
        }
    }
}

/// What the executor did with an intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Execution {
    Simulated,
    Filled {
        order_ref: String,
        /// Combined P/L in quote currency, when the account could report it
        overall_pl: Option<Decimal>,
    },
    Failed {
        reason: String,
    },
}

impl Execution {
    pub fn is_success(&self) -> bool {
        !matches!(self, Execution::Failed { .. })
    }
}

/// Result of one completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    NoOp {
        action: Action,
        reason: NoOpReason,
    },
    Order {
        action: Action,
        intent: OrderIntent,
        execution: Execution,
    },
}

impl RunOutcome {
    pub fn action(&self) -> Action {
        match self {
            RunOutcome::NoOp { action, .. } | RunOutcome::Order { action, .. } => *action,
        }
    }

    pub fn intent(&self) -> Option<&OrderIntent> {
        match self {
            RunOutcome::Order { intent, .. } => Some(intent),
            RunOutcome::NoOp { .. } => None,
        }
    }
}
