#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Authentication expired: {0}")]
    AuthenticationExpired(RefreshError),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures below the HTTP layer. Never retried by the client.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Http(e)
        }
    }
}

/// A failed credential refresh.
///
/// Cloneable so that every request waiting on the same refresh receives
/// the same failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RefreshError {
    status: Option<u16>,
    message: String,
}

impl RefreshError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Refresh endpoint answered with a non-success status.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    pub(crate) fn missing_credentials() -> Self {
        Self::new("no refresh token available")
    }

    /// HTTP status returned by the refresh endpoint, if it answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
