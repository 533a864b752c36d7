use parking_lot::RwLock;

use super::traits::CredentialStore;
use crate::types::{AccessToken, CredentialPair, RefreshToken};

#[derive(Debug, Default)]
struct Slots {
    access: Option<AccessToken>,
    refresh: Option<RefreshToken>,
}

/// Process-local [`CredentialStore`].
///
/// Useful for CLIs, background jobs and tests. Lives as long as the
/// session it represents: fill it at login, [`clear()`](Self::clear) it at logout.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slots: RwLock<Slots>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new(credentials: CredentialPair) -> Self {
        Self {
            slots: RwLock::new(Slots {
                access: Some(credentials.access_token),
                refresh: Some(credentials.refresh_token),
            }),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Forget both tokens.
    pub fn clear(&self) {
        *self.slots.write() = Slots::default();
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn access_token(&self) -> Option<AccessToken> {
        self.slots.read().access.clone()
    }

    fn refresh_token(&self) -> Option<RefreshToken> {
        self.slots.read().refresh.clone()
    }

    fn set_access_token(&self, token: AccessToken) {
        self.slots.write().access = Some(token);
    }

    fn set_refresh_token(&self, token: RefreshToken) {
        self.slots.write().refresh = Some(token);
    }
}
