use std::future::Future;

use serde_json::Value as JsonValue;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, TransportError};
use crate::request::{RequestDescriptor, Response};

/// Sends a [`RequestDescriptor`] somewhere and reports what came back.
///
/// Non-success statuses are ordinary responses. Only failures below HTTP
/// (connection, timeout, malformed URL) are errors. Timeouts are the
/// transport's responsibility.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        request: RequestDescriptor,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Build a transport whose client applies the configured timeout.
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
            base_url: config.base_url().clone(),
        })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidUrl(format!("{path}: {e}")))
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<Response, TransportError> {
        let url = self.resolve(&request.path)?;

        let mut builder = self
            .http
            .request(request.method, url)
            .headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;

        tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "response received");

        let mut response = Response::new(status, decode_body(&bytes));
        response.headers = headers;
        Ok(response)
    }
}

fn decode_body(bytes: &[u8]) -> JsonValue {
    if bytes.is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| JsonValue::String(String::from_utf8_lossy(bytes).into_owned()))
}
