use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::StatusCode;

use crate::config::ApiConfig;
use crate::error::RefreshError;
use crate::request::{RequestDescriptor, Response};
use crate::types::CredentialPair;

pub type RequestPredicate = Arc<dyn Fn(&RequestDescriptor) -> bool + Send + Sync>;
pub type ResponsePredicate = Arc<dyn Fn(&Response) -> bool + Send + Sync>;
pub type RefreshSuccessHook = Arc<dyn Fn(&CredentialPair) + Send + Sync>;
pub type RefreshFailureHook = Arc<dyn Fn(&RefreshError) + Send + Sync>;
pub type RefreshSpawner = Arc<dyn Fn(BoxFuture<'static, ()>) + Send + Sync>;

/// Hooks that decide how [`AuthenticatedHttpClient`](super::AuthenticatedHttpClient)
/// treats each request and response.
///
/// Every field has a default. Override with the `with_*` methods:
///
/// ```rust,ignore
/// let config = ClientConfig::default()
///     .with_should_apply_credential(|req| req.path != "auth/login")
///     .with_on_refresh_failure(|err| session.sign_out(err));
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) should_apply_credential: RequestPredicate,
    pub(crate) is_expired_credential: ResponsePredicate,
    pub(crate) on_refresh_success: RefreshSuccessHook,
    pub(crate) on_refresh_failure: RefreshFailureHook,
    pub(crate) spawn_refresh: RefreshSpawner,
}

impl Default for ClientConfig {
    /// Attach the token to every request, treat `403 Forbidden` as expiry,
    /// log refresh failures, run refreshes on the current Tokio runtime.
    fn default() -> Self {
        Self {
            should_apply_credential: Arc::new(|_| true),
            is_expired_credential: expired_on(StatusCode::FORBIDDEN),
            on_refresh_success: Arc::new(|_| {}),
            on_refresh_failure: Arc::new(|e| {
                tracing::warn!(error = %e, "Credential refresh failed, session is no longer valid");
            }),
            spawn_refresh: Arc::new(spawn_on_tokio),
        }
    }
}

impl ClientConfig {
    /// Defaults, with expiry detected on the API's configured status.
    #[must_use]
    pub fn for_api(api: &ApiConfig) -> Self {
        Self::default().with_expired_status(api.expired_status())
    }

    /// Decide per request whether the access token is attached.
    #[must_use]
    pub fn with_should_apply_credential(
        mut self,
        predicate: impl Fn(&RequestDescriptor) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.should_apply_credential = Arc::new(predicate);
        self
    }

    /// Decide whether a response means "access token expired".
    #[must_use]
    pub fn with_is_expired_credential(
        mut self,
        predicate: impl Fn(&Response) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_expired_credential = Arc::new(predicate);
        self
    }

    /// Shorthand for an expiry predicate matching a single status code.
    #[must_use]
    pub fn with_expired_status(mut self, status: StatusCode) -> Self {
        self.is_expired_credential = expired_on(status);
        self
    }

    /// Called after a refreshed pair has been written to the store.
    #[must_use]
    pub fn with_on_refresh_success(
        mut self,
        hook: impl Fn(&CredentialPair) + Send + Sync + 'static,
    ) -> Self {
        self.on_refresh_success = Arc::new(hook);
        self
    }

    /// Called once per failed refresh. This is where a hard sign-out belongs.
    #[must_use]
    pub fn with_on_refresh_failure(
        mut self,
        hook: impl Fn(&RefreshError) + Send + Sync + 'static,
    ) -> Self {
        self.on_refresh_failure = Arc::new(hook);
        self
    }

    /// Run refresh tasks somewhere other than the ambient Tokio runtime.
    ///
    /// The task must be polled to completion. Dropping it fails every
    /// waiter of that refresh with [`RefreshError`] and skips both hooks.
    #[must_use]
    pub fn with_refresh_spawner(
        mut self,
        spawner: impl Fn(BoxFuture<'static, ()>) + Send + Sync + 'static,
    ) -> Self {
        self.spawn_refresh = Arc::new(spawner);
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig").finish_non_exhaustive()
    }
}

fn spawn_on_tokio(task: BoxFuture<'static, ()>) {
    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => drop(runtime.spawn(task)),
        Err(e) => tracing::error!(error = %e, "No Tokio runtime to run the credential refresh on"),
    }
}

fn expired_on(status: StatusCode) -> ResponsePredicate {
    Arc::new(move |response: &Response| response.status == status)
}
