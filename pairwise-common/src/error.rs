//! Common error types for PairWise

use thiserror::Error;

/// Common result type for PairWise operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the session machine, file registry,
/// progression engines, and workflow gate.
///
/// Validation errors recover into a structured 4xx response; transient
/// provider failures are retryable; storage errors are fatal to the
/// request, never the process.
#[derive(Error, Debug)]
pub enum Error {
    /// Credential check failed; stage remains Unauthenticated
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Access code mismatch; stage remains CredentialsVerified
    #[error("Invalid access code. Please try again.")]
    InvalidAccessCode,

    /// Missing, malformed, or expired bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A voter file is already registered
    #[error("A voter file already exists in the system.")]
    DuplicateVoterFile,

    /// External file type not in the recognized set
    #[error("Unrecognized external file type: {0}")]
    UnrecognizedSubtype(String),

    /// Identical (category, subtype, file name) triple already registered
    #[error("This exact file entry already exists in the system.")]
    DuplicateFileEntry,

    /// Content validator rejected the uploaded file
    #[error("Invalid file content: {0}")]
    InvalidContent(String),

    /// Unknown file id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Matching or download attempted on a file that is not the active entry
    #[error("File is not the active entry for this operation")]
    NotActive,

    /// Matching provider failed or timed out; the record is unchanged and
    /// the call may be retried
    #[error("Matching failed: {0}")]
    MatchingFailed(String),

    /// Download provider failed or timed out; retryable like MatchingFailed
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    /// Operation attempted out of wizard order
    #[error("Operation not permitted in the current workflow step: {0}")]
    InvalidWorkflowState(String),

    /// Invalid user input or request parameter
    #[error("{0}")]
    InvalidInput(String),

    /// Backing store I/O or serialization failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
