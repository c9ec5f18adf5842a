//! Account collaborator: balances, profit/loss and account info.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::AccountError;
use crate::models::money::{Currency, Money};
use crate::models::order::PlSnapshot;

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Wallet balance for `currency`. `WalletNotFound` when the account has no
    /// wallet in that currency.
    async fn balance(&self, currency: &Currency) -> Result<Money, AccountError>;

    async fn profit_loss(&self, currency: &Currency) -> Result<PlSnapshot, AccountError>;

    /// Free-form description for the audit log
    async fn account_info(&self) -> Result<String, AccountError>;
}

/// In-memory account for simulation runs
#[derive(Default)]
pub struct PaperAccount {
    wallets: RwLock<HashMap<Currency, Money>>,
    profit_loss: RwLock<HashMap<Currency, PlSnapshot>>,
}

impl PaperAccount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wallets(wallets: impl IntoIterator<Item = Money>) -> Self {
        let wallets = wallets
            .into_iter()
            .map(|money| (money.currency.clone(), money))
            .collect();
        Self {
            wallets: RwLock::new(wallets),
            profit_loss: RwLock::new(HashMap::new()),
        }
    }

    pub async fn deposit(&self, money: Money) {
        let mut wallets = self.wallets.write().await;
        wallets
            .entry(money.currency.clone())
            .and_modify(|held| held.amount += money.amount)
            .or_insert(money);
    }

    pub async fn set_profit_loss(&self, snapshot: PlSnapshot) {
        self.profit_loss
            .write()
            .await
            .insert(snapshot.amount.currency.clone(), snapshot);
    }
}

#[async_trait]
impl AccountService for PaperAccount {
    async fn balance(&self, currency: &Currency) -> Result<Money, AccountError> {
        self.wallets
            .read()
            .await
            .get(currency)
            .cloned()
            .ok_or_else(|| AccountError::WalletNotFound(currency.clone()))
    }

    async fn profit_loss(&self, currency: &Currency) -> Result<PlSnapshot, AccountError> {
        if !self.wallets.read().await.contains_key(currency) {
            return Err(AccountError::WalletNotFound(currency.clone()));
        }
        Ok(self
            .profit_loss
            .read()
            .await
            .get(currency)
            .cloned()
            .unwrap_or_else(|| PlSnapshot {
                amount: Money::new(currency.clone(), Decimal::ZERO),
                percent: 0.0,
            }))
    }

    async fn account_info(&self) -> Result<String, AccountError> {
        let wallets = self.wallets.read().await;
        let mut lines: Vec<String> = wallets.values().map(|m| m.to_string()).collect();
        lines.sort();
        Ok(format!("Paper account wallets: [{}]", lines.join(", ")))
    }
}
