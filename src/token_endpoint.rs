use url::Url;

use crate::client::TokenRefresher;
use crate::config::ApiConfig;
use crate::error::{Error, RefreshError};
use crate::types::CredentialPair;

/// [`TokenRefresher`] that calls the backend's refresh endpoint.
///
/// Sends `POST <refresh_url>` with `{ "accessToken", "refreshToken" }` and
/// expects the new pair back in the same shape.
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    http: reqwest::Client,
    refresh_url: Url,
}

impl HttpTokenRefresher {
    #[must_use]
    pub fn new(refresh_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            refresh_url,
        }
    }

    /// Build a refresher for the configured endpoint and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            refresh_url: config.refresh_url().clone(),
        })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn refresh_url(&self) -> &Url {
        &self.refresh_url
    }

    /// Checks HTTP response status; returns the response on success or the
    /// endpoint's own explanation on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RefreshError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_owned)
            })
            .unwrap_or(body);
        let message = if detail.is_empty() {
            format!("refresh endpoint returned {status}")
        } else {
            format!("refresh endpoint returned {status}: {detail}")
        };
        Err(RefreshError::rejected(status, message))
    }
}

impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, credentials: CredentialPair) -> Result<CredentialPair, RefreshError> {
        let response = self
            .http
            .post(self.refresh_url.clone())
            .json(&credentials)
            .send()
            .await
            .map_err(|e| RefreshError::new(format!("refresh request failed: {e}")))?;

        let response = Self::ensure_success(response).await?;
        response
            .json::<CredentialPair>()
            .await
            .map_err(|e| RefreshError::new(format!("invalid refresh response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_uses_refresh_url() {
        let config = ApiConfig::new("https://admin.example.com/api".parse().unwrap());
        let refresher = HttpTokenRefresher::from_config(&config).unwrap();

        assert_eq!(
            refresher.refresh_url().as_str(),
            "https://admin.example.com/api/auth/refresh"
        );
    }
}
