//! Core application primitives (agent, scheduler, HTTP surface)

pub mod agent;
pub mod http;
pub mod scheduler;

pub use agent::TrendTradingAgent;
pub use http::*;
pub use scheduler::*;
