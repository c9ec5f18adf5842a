//! Decision core of a trend-following crypto trading agent.
//!
//! Each run reads an indicator snapshot, lets the enabled trend detectors vote,
//! resolves a single action, sizes an order within the configured risk limits
//! and submits it (or simulates it) through the exchange collaborator.

pub mod config;
pub mod core;
pub mod error;
pub mod execution;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
pub mod sizing;
