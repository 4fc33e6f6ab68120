//! Matching and download endpoints

use axum::{extract::State, Json};
use pairwise_common::types::{BeginRequest, MessageResponse};

use crate::error::ApiResult;
use crate::workflow;
use crate::AppState;

/// POST /pairwise/match
///
/// Runs the matching pass for the active file. The registry lock is held
/// across the provider call, serializing mutations as required by the
/// single-writer model.
pub async fn begin_match(
    State(state): State<AppState>,
    Json(req): Json<BeginRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let mut registry = state.registry.lock().await;
    workflow::ensure_matching_allowed(registry.list())?;
    state.matching.begin_matching(&mut registry, req.id).await?;

    Ok(Json(MessageResponse::new(
        "The matching process has completed successfully.",
    )))
}

/// POST /pairwise/download
pub async fn begin_download(
    State(state): State<AppState>,
    Json(req): Json<BeginRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let mut registry = state.registry.lock().await;
    workflow::ensure_download_allowed(registry.list())?;
    state.download.begin_download(&mut registry, req.id).await?;

    Ok(Json(MessageResponse::new(
        "The file has been successfully downloaded.",
    )))
}
