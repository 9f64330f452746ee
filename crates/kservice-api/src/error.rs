use axum::http::StatusCode;
use thiserror::Error;

/// Failure of one operation, carrying the message returned to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request input.
    #[error("{0}")]
    Validation(String),

    /// Lookup miss or failed fetch from the orchestrator.
    #[error("{0}")]
    NotFound(String),

    /// Descriptor could not be turned into a manifest, or back.
    #[error("{0}")]
    Translation(String),

    /// Orchestrator refused or failed a create.
    #[error("{0}")]
    Collaborator(String),

    /// Response payload could not be encoded.
    #[error("{0}")]
    Serialization(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Collaborator(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Translation(_) | ApiError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
