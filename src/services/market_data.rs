//! Market snapshot provider interface.
//!
//! Indicator computation happens upstream; the agent only reads the latest
//! snapshot once per run.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::ProviderError;
use crate::models::indicators::IndicatorSnapshot;

#[async_trait]
pub trait MarketSnapshotProvider: Send + Sync {
    /// Latest ticker and indicator values
    async fn snapshot(&self) -> Result<IndicatorSnapshot, ProviderError>;
}

/// Serves whatever snapshot was last stored. Useful for replays and tests.
pub struct StaticSnapshotProvider {
    snapshot: RwLock<Option<IndicatorSnapshot>>,
}

impl StaticSnapshotProvider {
    pub fn new(snapshot: IndicatorSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
        }
    }

    pub fn empty() -> Self {
        Self {
            snapshot: RwLock::new(None),
        }
    }

    pub async fn set(&self, snapshot: IndicatorSnapshot) {
        *self.snapshot.write().await = Some(snapshot);
    }
}

#[async_trait]
impl MarketSnapshotProvider for StaticSnapshotProvider {
    async fn snapshot(&self) -> Result<IndicatorSnapshot, ProviderError> {
        self.snapshot
            .read()
            .await
            .clone()
            .ok_or_else(|| ProviderError::Unavailable("no snapshot published yet".to_string()))
    }
}

/// Reads a JSON snapshot that the ticker manager rewrites on every update
pub struct FileSnapshotProvider {
    path: PathBuf,
}

impl FileSnapshotProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MarketSnapshotProvider for FileSnapshotProvider {
    async fn snapshot(&self) -> Result<IndicatorSnapshot, ProviderError> {
        debug!(path = %self.path.display(), "Reading market snapshot from {}", self.path.display());
        let raw = tokio::fs::read(&self.path).await?;
        let snapshot: IndicatorSnapshot = serde_json::from_slice(&raw)?;
        Ok(snapshot)
    }
}
