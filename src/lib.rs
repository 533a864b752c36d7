#![doc = include_str!("../README.md")]

pub mod client;
pub mod config;
pub mod error;
pub mod listing;
pub mod request;
#[cfg(feature = "services")]
pub mod services;
pub mod token_endpoint;
pub mod transport;
pub mod types;

// Re-exports for convenient access
pub use client::{
    AuthenticatedHttpClient, ClientConfig, CredentialStore, MemoryCredentialStore, TokenRefresher,
};
pub use config::ApiConfig;
pub use error::{Error, RefreshError, TransportError};
pub use listing::{
    FetchState, ListingData, ListingReconciler, ListingSources, ListingView, Notification,
    Notifier, PageNavigator, Pagination, SearchParams,
};
pub use request::{RequestDescriptor, Response};
#[cfg(feature = "services")]
pub use services::{Branding, BrandingId, BrandingInput, BrandingService, ListQuery};
pub use token_endpoint::HttpTokenRefresher;
pub use transport::{ReqwestTransport, Transport};
pub use types::{AccessToken, CredentialPair, RefreshToken};
