use std::future::Future;

use crate::error::RefreshError;
use crate::types::{AccessToken, CredentialPair, RefreshToken};

/// Consumer-provided credential storage.
///
/// Typically backed by the application's session (cookie, keychain, local
/// storage). The client reads tokens fresh before every dispatch and only
/// writes after a successful refresh.
///
/// # Example
///
/// ```rust,ignore
/// impl CredentialStore for CookieSession {
///     fn access_token(&self) -> Option<AccessToken> {
///         self.get("accessToken").map(AccessToken::new)
///     }
///     fn refresh_token(&self) -> Option<RefreshToken> {
///         self.get("refreshToken").map(RefreshToken::new)
///     }
///     fn set_access_token(&self, token: AccessToken) {
///         self.set("accessToken", token.secret());
///     }
///     fn set_refresh_token(&self, token: RefreshToken) {
///         self.set("refreshToken", token.secret());
///     }
/// }
/// ```
pub trait CredentialStore: Send + Sync + 'static {
    fn access_token(&self) -> Option<AccessToken>;

    fn refresh_token(&self) -> Option<RefreshToken>;

    fn set_access_token(&self, token: AccessToken);

    fn set_refresh_token(&self, token: RefreshToken);

    /// Current pair, or `None` when either half is missing.
    fn credentials(&self) -> Option<CredentialPair> {
        Some(CredentialPair {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
        })
    }
}

/// Exchanges the current credential pair for a new one.
///
/// Called at most once per expiry episode, no matter how many requests
/// observed the expiry.
pub trait TokenRefresher: Send + Sync + 'static {
    fn refresh(
        &self,
        credentials: CredentialPair,
    ) -> impl Future<Output = Result<CredentialPair, RefreshError>> + Send;
}
