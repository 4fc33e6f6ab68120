//! Workflow state and completion endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::progress::{download_progress, match_progress, ProgressSummary};
use crate::workflow::{current_step, ensure_confirm_allowed, WorkflowStep};
use crate::AppState;

/// GET /pairwise/workflow response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResponse {
    pub current_step: WorkflowStep,
    pub matching: ProgressSummary,
    pub download: ProgressSummary,
}

/// POST /pairwise/confirm-completion response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub status: String,
    pub message: String,
    pub current_step: WorkflowStep,
}

/// GET /pairwise/workflow
///
/// Single source of truth for the wizard position; clients redirect to
/// whatever step this reports.
pub async fn workflow_state(State(state): State<AppState>) -> ApiResult<Json<WorkflowResponse>> {
    let stage = {
        let session = state.session.lock().await;
        session.stage()
    };

    let registry = state.registry.lock().await;
    let records = registry.list();

    Ok(Json(WorkflowResponse {
        current_step: current_step(stage, records),
        matching: match_progress(records),
        download: download_progress(records),
    }))
}

/// POST /pairwise/confirm-completion
///
/// Terminal clear-all-data step: permitted only once every result has
/// been downloaded. Wipes the registry and ends the session.
pub async fn confirm_completion(
    State(state): State<AppState>,
) -> ApiResult<Json<ConfirmResponse>> {
    {
        let mut registry = state.registry.lock().await;
        ensure_confirm_allowed(registry.list())?;
        registry.clear_all()?;
    }

    let mut session = state.session.lock().await;
    session.logout();
    info!("wizard completed, all data cleared");

    Ok(Json(ConfirmResponse {
        status: "success".to_string(),
        message: "All uploaded data has been cleared.".to_string(),
        current_step: WorkflowStep::Cleared,
    }))
}
