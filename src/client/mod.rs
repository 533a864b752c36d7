//! Bearer-token HTTP client with single-flight credential refresh.
//!
//! Every request reads the current access token from a consumer-provided
//! [`CredentialStore`] and attaches it. When a response says the token has
//! expired (by default `403 Forbidden`), the client runs one refresh through
//! the [`TokenRefresher`], writes the new pair back to the store, and sends
//! the original request once more. Requests that hit the expiry while a
//! refresh is already running wait for that same refresh.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use admin_fetch::{ApiConfig, AuthenticatedHttpClient, ClientConfig, HttpTokenRefresher,
//!     MemoryCredentialStore, ReqwestTransport};
//!
//! let api = ApiConfig::from_env()?;
//! let store = Arc::new(MemoryCredentialStore::new(login_response.credentials));
//! let client = AuthenticatedHttpClient::with_config(
//!     ReqwestTransport::from_config(&api)?,
//!     store,
//!     HttpTokenRefresher::from_config(&api)?,
//!     ClientConfig::for_api(&api).with_on_refresh_failure(|_| redirect_to_login()),
//! );
//!
//! let response = client.get("brandings").await?;
//! ```

mod authenticated;
mod config;
mod state;
mod store;
mod traits;

pub use authenticated::AuthenticatedHttpClient;
pub use config::{
    ClientConfig, RefreshFailureHook, RefreshSuccessHook, RequestPredicate, ResponsePredicate,
};
pub use store::MemoryCredentialStore;
pub use traits::{CredentialStore, TokenRefresher};
