use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::Error;
use crate::types::AccessToken;

/// An outbound API call, independent of any HTTP client.
///
/// `path` is resolved against the transport's base URL.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<JsonValue>,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if `body` cannot be represented as JSON.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set the `Authorization: Bearer` header, replacing any previous one.
    pub(crate) fn set_bearer(&mut self, token: &AccessToken) -> Result<(), Error> {
        let mut value = HeaderValue::try_from(format!("Bearer {}", token.secret()))
            .map_err(|e| Error::InvalidHeader(e.to_string()))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// What came back from the transport.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `Null` for an empty body, a JSON string for a non-JSON body.
    pub data: JsonValue,
}

impl Response {
    #[must_use]
    pub fn new(status: StatusCode, data: JsonValue) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            data,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the payload does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        T::deserialize(&self.data).map_err(Into::into)
    }

    /// Human-readable failure reason carried by the payload, if any.
    ///
    /// Looks at `message`, then `error`, then a bare string body.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        let from_field = |key: &str| {
            self.data
                .get(key)
                .and_then(JsonValue::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        from_field("message")
            .or_else(|| from_field("error"))
            .or_else(|| {
                self.data
                    .as_str()
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
            })
    }

    /// Convert a non-success response into [`Error::Api`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] when the status is not 2xx.
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self
            .error_message()
            .unwrap_or_else(|| status_fallback_message(self.status));
        Err(Error::Api {
            status: self.status.as_u16(),
            message,
        })
    }
}

pub(crate) fn status_fallback_message(status: StatusCode) -> String {
    format!(
        "request failed with status {}",
        status.canonical_reason().map_or_else(
            || status.as_u16().to_string(),
            |reason| format!("{} {reason}", status.as_u16())
        )
    )
}
