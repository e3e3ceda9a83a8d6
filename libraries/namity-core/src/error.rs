/// Core error types for the Namity player
use crate::types::TrackId;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type shared by Namity collaborator traits
#[derive(Error, Debug)]
pub enum CoreError {
    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Malformed or unexpected data
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
