//! External matching and download providers
//!
//! The actual list-matching and result-file generation are external
//! collaborators. The shipped implementations simulate the work with a
//! bounded delay; the progression engines only depend on the traits.

use axum::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::registry::FileRecord;

/// Runs the matching pass for one external file
#[async_trait]
pub trait MatchProvider: Send + Sync {
    async fn run_match(&self, record: &FileRecord) -> anyhow::Result<()>;
}

/// Generates the downloadable result file for one matched record
#[async_trait]
pub trait DownloadProvider: Send + Sync {
    async fn generate_download(&self, record: &FileRecord) -> anyhow::Result<()>;
}

/// Fixed-delay stand-in for a real matching engine
pub struct SimulatedMatchProvider {
    pub delay: Duration,
}

#[async_trait]
impl MatchProvider for SimulatedMatchProvider {
    async fn run_match(&self, record: &FileRecord) -> anyhow::Result<()> {
        debug!(id = %record.id, file_name = %record.file_name, "simulating match run");
        sleep(self.delay).await;
        Ok(())
    }
}

/// Fixed-delay stand-in for result-file generation
pub struct SimulatedDownloadProvider {
    pub delay: Duration,
}

#[async_trait]
impl DownloadProvider for SimulatedDownloadProvider {
    async fn generate_download(&self, record: &FileRecord) -> anyhow::Result<()> {
        debug!(id = %record.id, file_name = %record.file_name, "simulating download generation");
        sleep(self.delay).await;
        Ok(())
    }
}
