use thiserror::Error;

/// Errors returned by [`NewsClient`](super::NewsClient) calls.
///
/// Callers decide how much of this to surface: the feed collapses every
/// variant into one "failed to load" message, while recommendations and
/// interaction tracking only log it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out")]
    Timeout,
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{}", .message.as_deref().unwrap_or("Request failed"))]
    Api { status: u16, message: Option<String> },
    #[error("Not logged in")]
    NotAuthenticated,
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Insecure API base URL: HTTPS required (except localhost for development)")]
    InsecureBaseUrl,
}

impl ApiError {
    /// True for failures that never reached the server or never came back.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Transport(_))
    }
}
