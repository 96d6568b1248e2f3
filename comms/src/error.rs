use thiserror::Error;

/// Classification of a failed backend call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The backend answered 404, e.g. an unknown or deleted room
    #[error("resource not found")]
    NotFound,

    /// The backend answered 401, the Spotify authorization of the session has expired
    #[error("authorization expired")]
    Unauthenticated,

    /// The backend answered with any other non-2xx status
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// No usable response, either the request never completed or the body could not be decoded
    #[error("request failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Whether the backend actually answered the request.
    pub fn is_response(&self) -> bool {
        !matches!(self, ApiError::Transport(_))
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
