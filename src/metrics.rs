//! Prometheus metrics for agent runs and the HTTP surface

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub agent_runs_total: IntCounter,
    pub agent_run_errors_total: IntCounter,
    pub agent_actions_total: IntCounterVec,
    pub agent_noops_total: IntCounterVec,
    pub orders_submitted_total: IntCounter,
    pub orders_failed_total: IntCounter,
    pub agent_run_duration_seconds: Histogram,
    pub agent_halted: Gauge,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let agent_runs_total = IntCounter::new("agent_runs_total", "Completed agent runs")?;
        let agent_run_errors_total =
            IntCounter::new("agent_run_errors_total", "Agent runs that ended in an error")?;
        let agent_actions_total = IntCounterVec::new(
            Opts::new("agent_actions_total", "Resolved actions by kind"),
            &["action"],
        )?;
        let agent_noops_total = IntCounterVec::new(
            Opts::new("agent_noops_total", "Runs that ended without an order, by reason"),
            &["reason"],
        )?;
        let orders_submitted_total = IntCounter::new(
            "orders_submitted_total",
            "Orders accepted by the exchange or simulated",
        )?;
        let orders_failed_total =
            IntCounter::new("orders_failed_total", "Orders the exchange did not accept")?;
        let agent_run_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "agent_run_duration_seconds",
            "Wall time of a single agent run",
        ))?;
        let agent_halted = Gauge::new("agent_halted", "1 when the scheduler has halted the agent")?;
        let http_requests_total = IntCounter::new("http_requests_total", "HTTP requests served")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests in progress")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;

        registry.register(Box::new(agent_runs_total.clone()))?;
        registry.register(Box::new(agent_run_errors_total.clone()))?;
        registry.register(Box::new(agent_actions_total.clone()))?;
        registry.register(Box::new(agent_noops_total.clone()))?;
        registry.register(Box::new(orders_submitted_total.clone()))?;
        registry.register(Box::new(orders_failed_total.clone()))?;
        registry.register(Box::new(agent_run_duration_seconds.clone()))?;
        registry.register(Box::new(agent_halted.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            agent_runs_total,
            agent_run_errors_total,
            agent_actions_total,
            agent_noops_total,
            orders_submitted_total,
            orders_failed_total,
            agent_run_duration_seconds,
            agent_halted,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    /// Prometheus text exposition of every registered metric
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
