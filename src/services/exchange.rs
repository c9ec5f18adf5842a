//! Exchange trading collaborator.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

use crate::error::TradeError;
use crate::models::order::MarketOrder;

#[async_trait]
pub trait TradeService: Send + Sync {
    /// Place a market order. `Ok(None)` or an empty reference means the
    /// exchange did not accept it.
    async fn place_market_order(&self, order: &MarketOrder) -> Result<Option<String>, TradeError>;
}

/// Accepts every order and hands out sequential references
#[derive(Default)]
pub struct PaperExchange {
    next_id: AtomicU64,
    placed: Mutex<Vec<MarketOrder>>,
}

impl PaperExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn placed_orders(&self) -> Vec<MarketOrder> {
        self.placed.lock().await.clone()
    }
}

#[async_trait]
impl TradeService for PaperExchange {
    async fn place_market_order(&self, order: &MarketOrder) -> Result<Option<String>, TradeError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.placed.lock().await.push(order.clone());
        Ok(Some(format!("paper-{}", id)))
    }
}
