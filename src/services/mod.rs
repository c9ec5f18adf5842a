//! External collaborators the agent consumes, with paper implementations.

pub mod account;
pub mod controls;
pub mod exchange;
pub mod market_data;

pub use account::{AccountService, PaperAccount};
pub use controls::{SharedControls, TradingControls};
pub use exchange::{PaperExchange, TradeService};
pub use market_data::{FileSnapshotProvider, MarketSnapshotProvider, StaticSnapshotProvider};
