use comms::ApiError;
use thiserror::Error;

/// Failures as the user gets to see them
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The room code is invalid, correctable by the user
    #[error("Room not found.")]
    NotFound,

    /// The Spotify authorization expired, recovered by re-authenticating
    #[error("Spotify authorization expired.")]
    Unauthenticated,

    /// Network failure or server error, shown once and never retried
    #[error("{0}")]
    Transient(String),

    /// Input rejected before any request was sent
    #[error("{0}")]
    Validation(String),
}

impl From<ApiError> for SyncError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => SyncError::NotFound,
            ApiError::Unauthenticated => SyncError::Unauthenticated,
            other => SyncError::Transient(other.user_message()),
        }
    }
}
