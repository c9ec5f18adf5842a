//! Cron-based scheduler driving periodic agent runs

use chrono::{DateTime, Utc};
use cron::Schedule;
use serde::Serialize;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::RwLock;
use tokio::task::AbortHandle;
use tracing::{error, info, warn};

use crate::core::agent::TrendTradingAgent;
use crate::metrics::Metrics;
use crate::models::outcome::{Execution, RunOutcome};

/// How a single scheduled run ended
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Completed { outcome: RunOutcome },
    Failed { error: String },
    Halted { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(flatten)]
    pub status: RunStatus,
}

/// State shared between the scheduler loop and the HTTP surface
#[derive(Debug, Default)]
pub struct RunState {
    halted: AtomicBool,
    last: RwLock<Option<RunReport>>,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl RunState {
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    pub async fn last_report(&self) -> Option<RunReport> {
        self.last.read().await.clone()
    }

    fn halt(&self) {
        self.halted.store(true, Ordering::SeqCst);
    }

    async fn record(&self, report: RunReport) {
        *self.last.write().await = Some(report);
    }

    fn set_in_flight(&self, run: Option<AbortHandle>) {
        *self.in_flight.lock().unwrap_or_else(PoisonError::into_inner) = run;
    }

    /// Abort the run currently executing, if any
    fn abort_in_flight(&self) -> bool {
        let run = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match run {
            Some(run) => {
                run.abort();
                true
            }
            None => false,
        }
    }
}

/// Whether `cron_expression` fires exactly every `interval_seconds`.
///
/// Step fields restart at every minute or hour boundary, so only steps that
/// divide 60 keep an even cadence. Whole minutes are required above 60s.
pub fn is_exact_interval(interval_seconds: u64) -> bool {
    match interval_seconds {
        0 => false,
        s if s < 60 => 60 % s == 0,
        s => s % 60 == 0 && 60 % (s / 60) == 0,
    }
}

/// Cron expression firing every `interval_seconds`
///
/// Cron format: second minute hour day month weekday
pub fn cron_expression(interval_seconds: u64) -> String {
    if interval_seconds >= 60 {
        format!("0 */{} * * * *", interval_seconds / 60)
    } else {
        format!("*/{} * * * * *", interval_seconds)
    }
}

/// Scheduler that runs the agent on every cron tick until stopped or halted
pub struct AgentScheduler {
    agent: Arc<TrendTradingAgent>,
    state: Arc<RunState>,
    metrics: Option<Arc<Metrics>>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl AgentScheduler {
    /// Create a new scheduler
    ///
    /// # Arguments
    /// * `agent` - Agent invoked on every tick
    /// * `interval_seconds` - Evaluation interval in seconds (0 = disabled)
    pub fn new(
        agent: Arc<TrendTradingAgent>,
        interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if interval_seconds == 0 {
            return Err("Scheduler disabled: interval_seconds is 0".into());
        }

        let cron_expr = cron_expression(interval_seconds);
        if !is_exact_interval(interval_seconds) {
            warn!(
                interval = interval_seconds,
                cron = %cron_expr,
                "AgentScheduler: {}s does not map onto an even cron cadence, runs will follow '{}'",
                interval_seconds,
                cron_expr
            );
        }
        let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid cron expression '{}': {}", cron_expr, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            "AgentScheduler: created with interval {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        Ok(Self {
            agent,
            state: Arc::new(RunState::default()),
            metrics: None,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn state(&self) -> Arc<RunState> {
        self.state.clone()
    }

    pub fn is_halted(&self) -> bool {
        self.state.is_halted()
    }

    /// Run the agent once outside the schedule. `None` once halted.
    pub async fn tick(&self) -> Option<RunStatus> {
        if self.state.is_halted() {
            warn!("AgentScheduler: halted, skipping run");
            return None;
        }
        Some(run_once(&self.agent, &self.state, self.metrics.as_deref()).await)
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.state.is_halted() {
            return Err("AgentScheduler: agent is halted".into());
        }

        let agent = self.agent.clone();
        let state = self.state.clone();
        let metrics = self.metrics.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("AgentScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                run_once(&agent, &state, metrics.as_deref()).await;

                if state.is_halted() {
                    error!("AgentScheduler: agent halted, no further runs will be scheduled");
                    break;
                }
            }
        });

        *self.handle.write().await = Some(handle);

        info!("AgentScheduler: started successfully");
        Ok(())
    }

    /// Stop the scheduler loop and abort any run still executing
    pub async fn stop(&self) {
        let handle = self.handle.write().await.take();
        if let Some(h) = handle {
            h.abort();
            // Wait for the loop to wind down so it cannot start another run
            let _ = h.await;
            info!("AgentScheduler: stopped");
        }
        if self.state.abort_in_flight() {
            warn!("AgentScheduler: aborted in-flight run");
        }
    }

    /// Check if the scheduler loop is still alive
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}

/// One guarded run. Panics inside the agent are caught at the task boundary.
async fn run_once(
    agent: &Arc<TrendTradingAgent>,
    state: &RunState,
    metrics: Option<&Metrics>,
) -> RunStatus {
    let start = Instant::now();
    let task_agent = agent.clone();
    let task = tokio::spawn(async move { task_agent.run().await });
    state.set_in_flight(Some(task.abort_handle()));
    let result = task.await;
    state.set_in_flight(None);
    let elapsed = start.elapsed();

    let status = match result {
        Ok(Ok(outcome)) => {
            if let Some(m) = metrics {
                record_outcome(m, &outcome);
            }
            RunStatus::Completed { outcome }
        }
        Ok(Err(e)) if e.is_fatal() => {
            error!(error = %e, "AgentScheduler: fatal error, halting agent: {}", e);
            state.halt();
            if let Some(m) = metrics {
                m.agent_run_errors_total.inc();
                m.agent_halted.set(1.0);
            }
            RunStatus::Halted {
                error: e.to_string(),
            }
        }
        Ok(Err(e)) => {
            error!(error = %e, "Caught unexpected error, run abandoned: {}", e);
            if let Some(m) = metrics {
                m.agent_run_errors_total.inc();
            }
            RunStatus::Failed {
                error: e.to_string(),
            }
        }
        Err(join_error) if join_error.is_cancelled() => {
            warn!("AgentScheduler: run cancelled before completion");
            RunStatus::Failed {
                error: join_error.to_string(),
            }
        }
        Err(join_error) => {
            error!(error = %join_error, "Caught unexpected error, run abandoned: {}", join_error);
            if let Some(m) = metrics {
                m.agent_run_errors_total.inc();
            }
            RunStatus::Failed {
                error: join_error.to_string(),
            }
        }
    };

    if let Some(m) = metrics {
        m.agent_run_duration_seconds.observe(elapsed.as_secs_f64());
    }
    state
        .record(RunReport {
            finished_at: Utc::now(),
            duration_ms: elapsed.as_millis() as u64,
            status: status.clone(),
        })
        .await;

    status
}

fn record_outcome(metrics: &Metrics, outcome: &RunOutcome) {
    metrics.agent_runs_total.inc();
    metrics
        .agent_actions_total
        .with_label_values(&[outcome.action().as_str()])
        .inc();
    match outcome {
        RunOutcome::NoOp { reason, .. } => {
            metrics
                .agent_noops_total
                .with_label_values(&[reason.as_str()])
                .inc();
        }
        RunOutcome::Order { execution, .. } => match execution {
            Execution::Failed { .. } => metrics.orders_failed_total.inc(),
            Execution::Simulated | Execution::Filled { .. } => {
                metrics.orders_submitted_total.inc()
            }
        },
    }
}
