//! Workflow gate
//!
//! Derives the single current wizard step from session stage and registry
//! contents, and guards privileged operations so nothing runs out of
//! order. Guards fail closed: an out-of-order request is rejected before
//! any state changes.

use pairwise_common::{Error, Result};
use serde::Serialize;

use crate::progress::{download_progress, eligible_for_matching, match_progress};
use crate::registry::FileRecord;
use crate::session::AuthStage;

/// Ordered wizard steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    Login,
    UploadVoter,
    UploadExternal,
    Matching,
    Download,
    ConfirmCompletion,
    /// Terminal acknowledgement reported by the teardown operations;
    /// afterwards the derived step returns to Login
    Cleared,
}

/// Compute the wizard's current step. The displayed step never advances
/// past a point whose backing invariant is false.
pub fn current_step(stage: AuthStage, records: &[FileRecord]) -> WorkflowStep {
    if stage != AuthStage::Authenticated {
        return WorkflowStep::Login;
    }

    if !records.iter().any(FileRecord::is_voter) {
        return WorkflowStep::UploadVoter;
    }

    if eligible_for_matching(records).is_empty() {
        return WorkflowStep::UploadExternal;
    }

    if !match_progress(records).all_completed {
        return WorkflowStep::Matching;
    }

    if !download_progress(records).all_completed {
        return WorkflowStep::Download;
    }

    WorkflowStep::ConfirmCompletion
}

/// Matching requires a voter file plus at least one eligible external file
pub fn ensure_matching_allowed(records: &[FileRecord]) -> Result<()> {
    if !records.iter().any(FileRecord::is_voter) {
        return Err(Error::InvalidWorkflowState(
            "matching requires a voter file".to_string(),
        ));
    }
    if eligible_for_matching(records).is_empty() {
        return Err(Error::InvalidWorkflowState(
            "matching requires at least one external file".to_string(),
        ));
    }
    Ok(())
}

/// Downloads open up only once every eligible file has been matched
pub fn ensure_download_allowed(records: &[FileRecord]) -> Result<()> {
    ensure_matching_allowed(records)?;
    if !match_progress(records).all_completed {
        return Err(Error::InvalidWorkflowState(
            "downloads are not available until matching is complete".to_string(),
        ));
    }
    Ok(())
}

/// The terminal clear-all-data step requires every download to be done
pub fn ensure_confirm_allowed(records: &[FileRecord]) -> Result<()> {
    ensure_download_allowed(records)?;
    if !download_progress(records).all_completed {
        return Err(Error::InvalidWorkflowState(
            "completion cannot be confirmed until all results are downloaded".to_string(),
        ));
    }
    Ok(())
}
