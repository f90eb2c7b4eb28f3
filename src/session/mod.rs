//! Shared provider session state. After a successful login the controller
//! writes the provider and practice identity here; the rest of the application
//! reads it to scope requests. The store is an owned handle passed to
//! consumers instead of a process global, and it only ever holds a complete
//! [`SessionInfo`]. Nothing here is secret, but it is still patient-adjacent
//! metadata and should not be logged wholesale.

mod profile;

pub use profile::{ProviderProfile, ProviderRow};

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Identity of the signed-in provider, replaced wholesale on every login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub provider_id: Uuid,
    pub practice_id: String,
    pub provider_first_name: String,
    pub provider_last_name: String,
}

impl From<ProviderProfile> for SessionInfo {
    fn from(profile: ProviderProfile) -> Self {
        Self {
            provider_id: profile.provider_id,
            practice_id: profile.practice_id,
            provider_first_name: profile.first_name,
            provider_last_name: profile.last_name,
        }
    }
}

/// Cloneable handle to the current provider session.
///
/// Clones share the same slot. Writes swap the whole value under the lock, so a
/// reader sees either the previous session or the new one, never a mix.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<SessionInfo>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored session with `info`.
    pub fn set_provider_info(&self, info: SessionInfo) {
        debug!(provider_id = %info.provider_id, "storing provider session");
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(info);
    }

    /// Returns a copy of the current session, if any.
    #[must_use]
    pub fn provider_info(&self) -> Option<SessionInfo> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears the stored session, typically on logout.
    pub fn clear(&self) {
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
