//! File upload and listing endpoints

use axum::{
    extract::{Multipart, State},
    Json,
};
use pairwise_common::types::MessageResponse;
use pairwise_common::Error;
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::progress::{download_status, match_status, Phase};
use crate::registry::{FileCategory, FileRecord};
use crate::AppState;

/// File record plus its server-computed progression phases. The phases
/// are derived here and nowhere else; clients render them as-is.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatusEntry {
    #[serde(flatten)]
    pub record: FileRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_status: Option<Phase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloading_status: Option<Phase>,
}

/// POST /pairwise/file (multipart: file, fileType, externalFileType?)
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<MessageResponse>> {
    let mut file_name: Option<String> = None;
    let mut content: Vec<u8> = Vec::new();
    let mut file_type: Option<String> = None;
    let mut external_file_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidInput(format!("invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                content = field
                    .bytes()
                    .await
                    .map_err(|e| Error::InvalidInput(format!("failed to read upload: {}", e)))?
                    .to_vec();
            }
            Some("fileType") => {
                file_type = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| Error::InvalidInput(format!("invalid fileType: {}", e)))?,
                );
            }
            Some("externalFileType") => {
                let value = field.text().await.map_err(|e| {
                    Error::InvalidInput(format!("invalid externalFileType: {}", e))
                })?;
                if !value.is_empty() {
                    external_file_type = Some(value);
                }
            }
            _ => {}
        }
    }

    let file_type = file_type
        .ok_or_else(|| Error::InvalidInput("File type is required".to_string()))?;
    let file_name =
        file_name.ok_or_else(|| Error::InvalidInput("No file was uploaded".to_string()))?;
    let category = FileCategory::parse(&file_type)?;

    let mut registry = state.registry.lock().await;
    let record = registry.add_file(
        category,
        external_file_type.as_deref(),
        &file_name,
        &content,
        state.validator.as_ref(),
    )?;

    info!(id = %record.id, file_name = %record.file_name, "file uploaded");
    Ok(Json(MessageResponse::new("File uploaded successfully")))
}

/// GET /pairwise/files
pub async fn list_files(State(state): State<AppState>) -> ApiResult<Json<Vec<FileStatusEntry>>> {
    let registry = state.registry.lock().await;
    let records = registry.list();

    let matching = match_status(records);
    let downloading = download_status(records);

    let entries = records
        .iter()
        .map(|record| FileStatusEntry {
            record: record.clone(),
            matching_status: matching.get(&record.id).copied(),
            downloading_status: downloading.get(&record.id).copied(),
        })
        .collect();

    Ok(Json(entries))
}
