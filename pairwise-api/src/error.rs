//! HTTP mapping for the PairWise error taxonomy

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pairwise_common::Error;
use serde_json::json;

/// Wraps the domain error so handlers can use `?` and still produce the
/// wire-contract error bodies.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Wrong access code keeps the original retry envelope
        if matches!(self.0, Error::InvalidAccessCode) {
            let body = Json(json!({
                "status": "error",
                "message": self.0.to_string(),
                "next_step": "retry",
            }));
            return (StatusCode::UNAUTHORIZED, body).into_response();
        }

        let status = match &self.0 {
            Error::InvalidCredentials | Error::InvalidAccessCode | Error::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Error::DuplicateVoterFile
            | Error::UnrecognizedSubtype(_)
            | Error::DuplicateFileEntry
            | Error::InvalidContent(_)
            | Error::NotActive
            | Error::InvalidWorkflowState(_)
            | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::MatchingFailed(_) | Error::DownloadFailed(_) | Error::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "message": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
