use std::sync::{Arc, Weak};

use futures::channel::oneshot;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;

use super::config::ClientConfig;
use super::traits::{CredentialStore, TokenRefresher};
use crate::error::{Error, RefreshError};
use crate::request::{RequestDescriptor, Response};
use crate::transport::Transport;

/// A refresh that every expired request can await. All waiters observe the
/// same result.
pub(super) type PendingRefresh = Shared<BoxFuture<'static, Result<(), RefreshError>>>;

/// State shared by all clones of one client.
pub(super) struct ClientState<T, S, R> {
    pub(super) transport: T,
    pub(super) store: Arc<S>,
    pub(super) refresher: R,
    pub(super) config: ClientConfig,
    // At most one refresh per client. Cleared by the refresh task when it
    // settles, or by a waiter that finds the task was dropped.
    in_flight: Mutex<Option<PendingRefresh>>,
}

impl<T, S, R> ClientState<T, S, R>
where
    T: Transport,
    S: CredentialStore,
    R: TokenRefresher,
{
    pub(super) fn new(transport: T, store: Arc<S>, refresher: R, config: ClientConfig) -> Self {
        Self {
            transport,
            store,
            refresher,
            config,
            in_flight: Mutex::new(None),
        }
    }

    pub(super) fn is_refreshing(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Attach the current access token (if the request wants one) and send.
    pub(super) async fn dispatch(&self, mut request: RequestDescriptor) -> Result<Response, Error> {
        if (self.config.should_apply_credential)(&request) {
            if let Some(token) = self.store.access_token() {
                request.set_bearer(&token)?;
            }
        }
        Ok(self.transport.send(request).await?)
    }

    /// Join the in-flight refresh, or start one.
    ///
    /// Check and set happen under one lock with no await in between. A new
    /// refresh is handed to the configured spawner, so it settles even if
    /// every waiter is dropped. Waiters only hold the receiving end.
    pub(super) fn refresh(self: &Arc<Self>) -> PendingRefresh {
        let (pending, task) = {
            let mut slot = self.in_flight.lock();
            if let Some(pending) = slot.as_ref() {
                tracing::debug!("Joining in-flight credential refresh");
                return pending.clone();
            }

            let (settled_tx, settled_rx) = oneshot::channel();
            let waiter_state: Weak<Self> = Arc::downgrade(self);
            let pending = settled_rx
                .map(move |settled| {
                    settled.unwrap_or_else(|_| {
                        // The task was dropped before it could answer.
                        if let Some(state) = waiter_state.upgrade() {
                            state.in_flight.lock().take();
                        }
                        Err(RefreshError::new("credential refresh was abandoned"))
                    })
                })
                .boxed()
                .shared();
            *slot = Some(pending.clone());

            let task_state: Weak<Self> = Arc::downgrade(self);
            let task = async move {
                let Some(state) = task_state.upgrade() else {
                    return;
                };
                let outcome = state.run_refresh().await;
                let _ = settled_tx.send(outcome);
            }
            .boxed();
            (pending, task)
        };

        (self.config.spawn_refresh)(task);
        pending
    }

    async fn run_refresh(&self) -> Result<(), RefreshError> {
        tracing::debug!("Starting credential refresh");

        let result = match self.store.credentials() {
            Some(credentials) => self.refresher.refresh(credentials).await,
            None => Err(RefreshError::missing_credentials()),
        };

        let outcome = match result {
            Ok(credentials) => {
                self.store
                    .set_access_token(credentials.access_token.clone());
                self.store
                    .set_refresh_token(credentials.refresh_token.clone());
                (self.config.on_refresh_success)(&credentials);
                tracing::info!("Credentials refreshed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, status = ?e.status(), "Credential refresh failed");
                (self.config.on_refresh_failure)(&e);
                Err(e)
            }
        };

        self.in_flight.lock().take();
        outcome
    }
}
