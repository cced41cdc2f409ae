//! In-memory access credential.
//!
//! The access token lives only in process memory. The long-lived refresh
//! credential is an HTTP-only cookie held by the HTTP client's cookie jar and
//! is never visible here.
//!
//! Expiry is checked lazily: a read past the deadline clears the slot and
//! reports no credential, so callers fall into the refresh path.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use zeroize::Zeroizing;

/// A bearer token with its absolute expiry instant.
struct Credential {
    access_token: Zeroizing<String>,
    expires_at: DateTime<Utc>,
}

impl Credential {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Single source of truth for the current access credential.
///
/// One instance is created per [`crate::Taskboard`] and shared by `Arc`
/// between the refresher, the API client and the auth service.
#[derive(Default)]
pub struct CredentialStore {
    current: Mutex<Option<Credential>>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("expires_at", &self.expires_at())
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Credential>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a token that expires `expires_in_secs` from now.
    ///
    /// `expires_in` comes from the server, so it is never trusted to fit a
    /// calendar: a lifetime past chrono's range is pinned to the latest
    /// representable instant and a negative one means already expired.
    pub fn set(&self, access_token: impl Into<String>, expires_in_secs: i64) {
        self.set_with_expiry(access_token, expiry_after(Utc::now(), expires_in_secs));
    }

    /// Store a token with an absolute expiry instant.
    pub fn set_with_expiry(&self, access_token: impl Into<String>, expires_at: DateTime<Utc>) {
        *self.slot() = Some(Credential {
            access_token: Zeroizing::new(access_token.into()),
            expires_at,
        });
    }

    /// Current token, or `None` when absent or expired.
    ///
    /// An expired credential is dropped as a side effect of the read.
    pub fn get(&self) -> Option<String> {
        let mut slot = self.slot();
        let expired_at = match slot.as_ref() {
            None => return None,
            Some(cred) if cred.is_expired(Utc::now()) => cred.expires_at,
            Some(cred) => return Some(cred.access_token.to_string()),
        };

        tracing::debug!(expires_at = %expired_at, "access token expired, clearing");
        *slot = None;
        None
    }

    /// Expiry of the stored credential, whether or not it has passed.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.slot().as_ref().map(|c| c.expires_at)
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    pub fn clear(&self) {
        *self.slot() = None;
    }
}

fn expiry_after(now: DateTime<Utc>, expires_in_secs: i64) -> DateTime<Utc> {
    if expires_in_secs <= 0 {
        return now;
    }
    match Duration::try_seconds(expires_in_secs).and_then(|d| now.checked_add_signed(d)) {
        Some(at) => at,
        None => {
            tracing::debug!(expires_in = expires_in_secs, "token lifetime out of range, clamping");
            DateTime::<Utc>::MAX_UTC
        }
    }
}
