//! Error types shared across the agent.

use thiserror::Error;

use crate::models::money::Currency;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(String),

    #[error("invalid value {value:?} for setting {key}")]
    Invalid { key: String, value: String },
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("market snapshot unavailable: {0}")]
    Unavailable(String),

    #[error("invalid market snapshot: {0}")]
    InvalidSnapshot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("could not find wallet for {0}")]
    WalletNotFound(Currency),

    #[error("account service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradeError {
    #[error("order rejected: {0}")]
    Rejected(String),

    #[error("exchange unreachable: {0}")]
    Transport(String),
}

/// Errors that end a run early. `WalletNotFound` is the only one the owner
/// should treat as fatal.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("could not find wallet for {0}")]
    WalletNotFound(Currency),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("account error: {0}")]
    Account(AccountError),
}

impl AgentError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, AgentError::WalletNotFound(_))
    }
}

impl From<AccountError> for AgentError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::WalletNotFound(currency) => AgentError::WalletNotFound(currency),
            other => AgentError::Account(other),
        }
    }
}
