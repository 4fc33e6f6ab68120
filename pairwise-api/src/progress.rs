//! Matching and download progression
//!
//! Per-file status is derived, never stored: registry order plus the
//! completion flags fully determine which file is completed, which single
//! file is active, and which are pending. The server is the only place
//! this derivation happens; clients render what `GET /pairwise/files`
//! returns.

use pairwise_common::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::provider::{DownloadProvider, MatchProvider};
use crate::registry::{FileCategory, FileRecord, FileRegistry};

/// Derived per-file progression phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Completed,
    Active,
    Pending,
}

/// Completion counts over an eligible sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
    pub all_completed: bool,
}

/// External records with a recognized subtype, in registry order.
/// Only these are subject to matching.
pub fn eligible_for_matching(records: &[FileRecord]) -> Vec<&FileRecord> {
    records
        .iter()
        .filter(|r| r.file_type == FileCategory::External && r.external_file_type.is_some())
        .collect()
}

/// All external records, in registry order. Every external file becomes
/// downloadable; voter files are pre-completed and excluded.
pub fn downloadable(records: &[FileRecord]) -> Vec<&FileRecord> {
    records
        .iter()
        .filter(|r| r.file_type == FileCategory::External)
        .collect()
}

/// Per-file matching phase; ineligible records are absent from the map
pub fn match_status(records: &[FileRecord]) -> HashMap<Uuid, Phase> {
    phases(&eligible_for_matching(records), |r| r.match_status)
}

/// Per-file download phase; mirrors `match_status` over downloadable records
pub fn download_status(records: &[FileRecord]) -> HashMap<Uuid, Phase> {
    phases(&downloadable(records), |r| r.download_status)
}

/// Matching completion counts over the eligible sequence only
pub fn match_progress(records: &[FileRecord]) -> ProgressSummary {
    summarize(&eligible_for_matching(records), |r| r.match_status)
}

/// Download completion counts over all external records
pub fn download_progress(records: &[FileRecord]) -> ProgressSummary {
    summarize(&downloadable(records), |r| r.download_status)
}

fn phases(eligible: &[&FileRecord], done: impl Fn(&FileRecord) -> bool) -> HashMap<Uuid, Phase> {
    let mut map = HashMap::with_capacity(eligible.len());
    let mut active_assigned = false;

    for record in eligible {
        let phase = if done(record) {
            Phase::Completed
        } else if !active_assigned {
            active_assigned = true;
            Phase::Active
        } else {
            Phase::Pending
        };
        map.insert(record.id, phase);
    }

    map
}

fn summarize(eligible: &[&FileRecord], done: impl Fn(&FileRecord) -> bool) -> ProgressSummary {
    let total = eligible.len();
    let completed = eligible.iter().filter(|r| done(r)).count();
    ProgressSummary {
        completed,
        total,
        all_completed: total > 0 && completed == total,
    }
}

/// Drives the matching pass for the single active file
pub struct MatchingEngine {
    provider: Arc<dyn MatchProvider>,
    timeout: Duration,
}

impl MatchingEngine {
    pub fn new(provider: Arc<dyn MatchProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Run matching for `id`. Only the active file may be matched; a
    /// provider failure or timeout leaves the record untouched so the
    /// call can be retried.
    pub async fn begin_matching(&self, registry: &mut FileRegistry, id: Uuid) -> Result<()> {
        let record = registry
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("no file with id {}", id)))?
            .clone();

        match match_status(registry.list()).get(&id) {
            Some(Phase::Active) => {}
            _ => return Err(Error::NotActive),
        }

        match tokio::time::timeout(self.timeout, self.provider.run_match(&record)).await {
            Ok(Ok(())) => {
                registry.mark_matched(id)?;
                info!(id = %id, file_name = %record.file_name, "matching completed");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(id = %id, error = %e, "match provider failed");
                Err(Error::MatchingFailed(e.to_string()))
            }
            Err(_) => {
                warn!(id = %id, "match provider timed out");
                Err(Error::MatchingFailed("matching operation timed out".to_string()))
            }
        }
    }
}

/// Drives result-file download for the single active file
pub struct DownloadEngine {
    provider: Arc<dyn DownloadProvider>,
    timeout: Duration,
}

impl DownloadEngine {
    pub fn new(provider: Arc<dyn DownloadProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Same contract as `MatchingEngine::begin_matching`, over the
    /// downloadable sequence and `downloadStatus`.
    pub async fn begin_download(&self, registry: &mut FileRegistry, id: Uuid) -> Result<()> {
        let record = registry
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("no file with id {}", id)))?
            .clone();

        match download_status(registry.list()).get(&id) {
            Some(Phase::Active) => {}
            _ => return Err(Error::NotActive),
        }

        match tokio::time::timeout(self.timeout, self.provider.generate_download(&record)).await {
            Ok(Ok(())) => {
                registry.mark_downloaded(id)?;
                info!(id = %id, file_name = %record.file_name, "download completed");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(id = %id, error = %e, "download provider failed");
                Err(Error::DownloadFailed(e.to_string()))
            }
            Err(_) => {
                warn!(id = %id, "download provider timed out");
                Err(Error::DownloadFailed("download operation timed out".to_string()))
            }
        }
    }
}
