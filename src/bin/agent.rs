//! Trend-following trading agent
//!
//! Runs the agent on a fixed interval against the paper account and exchange,
//! and serves health, metrics and last-run status over HTTP.

use dotenvy::dotenv;
use std::env;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use trendagent::config::{self, AgentConfig, ControlSettings};
use trendagent::core::http::{start_server, AppState};
use trendagent::core::scheduler::AgentScheduler;
use trendagent::core::TrendTradingAgent;
use trendagent::logging;
use trendagent::metrics::Metrics;
use trendagent::services::{
    FileSnapshotProvider, MarketSnapshotProvider, PaperAccount, PaperExchange, SharedControls,
    StaticSnapshotProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let environment = config::get_environment();
    info!("Starting trend following trading agent");
    info!(environment = %environment, "Environment");

    let agent_config = AgentConfig::from_env()?;
    let settings = ControlSettings::from_env();
    let eval_interval = config::get_eval_interval();
    let port = config::get_port();

    info!(
        base = %agent_config.base_currency,
        local = %agent_config.local_currency,
        algorithm = ?agent_config.algorithm,
        detectors = ?agent_config.detectors,
        "Trading {} against {}",
        agent_config.base_currency,
        agent_config.local_currency
    );
    if settings.simulation {
        info!("Simulation mode is on, no orders will reach the exchange");
    } else {
        warn!("Simulation mode is off, orders will be submitted");
    }

    let provider: Arc<dyn MarketSnapshotProvider> = match config::get_snapshot_path() {
        Some(path) => {
            info!(path = %path.display(), "Reading indicator snapshots from {}", path.display());
            Arc::new(FileSnapshotProvider::new(path))
        }
        None => {
            warn!("SNAPSHOT_PATH not set - runs will fail until a snapshot is available");
            Arc::new(StaticSnapshotProvider::empty())
        }
    };

    let account = Arc::new(PaperAccount::with_wallets(config::paper_wallets(
        &agent_config,
        |key| env::var(key).ok(),
    )));
    let exchange = Arc::new(PaperExchange::new());
    let controls = Arc::new(SharedControls::new(
        settings.simulation,
        settings.trend_trading_disabled,
    ));
    let metrics = Arc::new(Metrics::new()?);

    let agent = Arc::new(TrendTradingAgent::new(
        agent_config,
        provider,
        account,
        exchange,
        controls,
    ));

    let scheduler = AgentScheduler::new(agent, eval_interval)
        .map_err(|e| format!("Failed to create scheduler: {}", e))?
        .with_metrics(metrics.clone());

    let state = AppState::new(metrics, scheduler.state());
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server error: {}", e);
        }
    });

    scheduler
        .start()
        .await
        .map_err(|e| format!("Failed to start scheduler: {}", e))?;

    info!("Agent started, waiting for shutdown signal...");
    signal::ctrl_c().await?;

    info!("Shutting down agent...");
    scheduler.stop().await;
    server_handle.abort();
    info!("Agent stopped");

    Ok(())
}
