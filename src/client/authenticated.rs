use std::sync::Arc;

use serde::Serialize;

use super::config::ClientConfig;
use super::state::ClientState;
use super::traits::{CredentialStore, TokenRefresher};
use crate::error::Error;
use crate::request::{RequestDescriptor, Response};
use crate::transport::Transport;

/// HTTP client that attaches a bearer token to each request and recovers
/// from an expired token with one shared refresh and one retry.
///
/// Clones share the same store, transport and refresh slot.
pub struct AuthenticatedHttpClient<T, S, R> {
    state: Arc<ClientState<T, S, R>>,
}

// Manual Clone: avoid derive adding `T: Clone, S: Clone, R: Clone` bounds.
impl<T, S, R> Clone for AuthenticatedHttpClient<T, S, R> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T, S, R> AuthenticatedHttpClient<T, S, R>
where
    T: Transport,
    S: CredentialStore,
    R: TokenRefresher,
{
    /// Create a client with the default [`ClientConfig`].
    #[must_use]
    pub fn new(transport: T, store: Arc<S>, refresher: R) -> Self {
        Self::with_config(transport, store, refresher, ClientConfig::default())
    }

    #[must_use]
    pub fn with_config(transport: T, store: Arc<S>, refresher: R, config: ClientConfig) -> Self {
        Self {
            state: Arc::new(ClientState::new(transport, store, refresher, config)),
        }
    }

    /// The credential store this client reads from and writes to.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.state.store
    }

    /// Whether a credential refresh is currently in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state.is_refreshing()
    }

    /// Send a request, refreshing the credential once if it has expired.
    ///
    /// Responses are returned whatever their status, unless the expiry
    /// predicate matches. In that case the caller waits for the shared
    /// refresh, then the request is sent again exactly once and that
    /// second response is returned as-is.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] on network failure or timeout (never retried).
    /// - [`Error::AuthenticationExpired`] if the refresh failed.
    /// - [`Error::InvalidHeader`] if the stored token is not a valid header value.
    pub async fn request(&self, request: RequestDescriptor) -> Result<Response, Error> {
        let response = self.state.dispatch(request.clone()).await?;
        if !(self.state.config.is_expired_credential)(&response) {
            return Ok(response);
        }

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = response.status.as_u16(),
            "Access token expired"
        );

        self.state
            .refresh()
            .await
            .map_err(Error::AuthenticationExpired)?;

        self.state.dispatch(request).await
    }

    /// # Errors
    ///
    /// See [`request()`](Self::request).
    pub async fn get(&self, path: &str) -> Result<Response, Error> {
        self.request(RequestDescriptor::get(path)).await
    }

    /// # Errors
    ///
    /// See [`request()`](Self::request).
    pub async fn delete(&self, path: &str) -> Result<Response, Error> {
        self.request(RequestDescriptor::delete(path)).await
    }

    /// # Errors
    ///
    /// [`Error::Decode`] if `body` cannot be serialized, otherwise see
    /// [`request()`](Self::request).
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, Error> {
        self.request(RequestDescriptor::post(path).with_json(body)?)
            .await
    }

    /// # Errors
    ///
    /// [`Error::Decode`] if `body` cannot be serialized, otherwise see
    /// [`request()`](Self::request).
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, Error> {
        self.request(RequestDescriptor::put(path).with_json(body)?)
            .await
    }
}
