use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use crate::error::Error;

const DEFAULT_REFRESH_PATH: &str = "auth/refresh";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend API settings.
///
/// The base URL is a constructor parameter. Everything else has a default
/// that can be overridden with the `with_*` methods, or loaded through
/// [`from_env()`](ApiConfig::from_env).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ApiConfig {
    pub(crate) base_url: Url,
    pub(crate) refresh_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) expired_status: StatusCode,
}

impl ApiConfig {
    /// Create a configuration rooted at `base_url`.
    ///
    /// A trailing slash is added to the base path so relative request paths
    /// resolve beneath it rather than replacing its last segment.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let base_url = with_trailing_slash(base_url);
        let refresh_url = base_url
            .join(DEFAULT_REFRESH_PATH)
            .unwrap_or_else(|_| base_url.clone());
        Self {
            base_url,
            refresh_url,
            timeout: DEFAULT_TIMEOUT,
            expired_status: StatusCode::FORBIDDEN,
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `API_BASE_URL`: root of the backend API (must be a valid URL)
    ///
    /// # Optional env vars
    /// - `API_REFRESH_URL`: token refresh endpoint (default `<base>/auth/refresh`)
    /// - `API_TIMEOUT_SECS`: per-request timeout in seconds (default 30)
    /// - `API_EXPIRED_STATUS`: status code that signals an expired access token (default 403)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or a value is invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let base_url_str = lookup("API_BASE_URL")
            .ok_or_else(|| Error::Config("API_BASE_URL is required".into()))?;
        let base_url: Url = base_url_str
            .parse()
            .map_err(|e| Error::Config(format!("API_BASE_URL: {e}")))?;

        let mut config = Self::new(base_url);

        if let Some(url_str) = lookup("API_REFRESH_URL") {
            let url: Url = url_str
                .parse()
                .map_err(|e| Error::Config(format!("API_REFRESH_URL: {e}")))?;
            config = config.with_refresh_url(url);
        }
        if let Some(secs) = lookup("API_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("API_TIMEOUT_SECS: {e}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(status) = lookup("API_EXPIRED_STATUS") {
            let status = status
                .trim()
                .parse::<u16>()
                .ok()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .ok_or_else(|| {
                    Error::Config(format!("API_EXPIRED_STATUS: invalid status code '{status}'"))
                })?;
            config = config.with_expired_status(status);
        }

        Ok(config)
    }

    /// Override the token refresh endpoint.
    #[must_use]
    pub fn with_refresh_url(mut self, url: Url) -> Self {
        self.refresh_url = url;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the status code treated as "access token expired".
    #[must_use]
    pub fn with_expired_status(mut self, status: StatusCode) -> Self {
        self.expired_status = status;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn refresh_url(&self) -> &Url {
        &self.refresh_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn expired_status(&self) -> StatusCode {
        self.expired_status
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
