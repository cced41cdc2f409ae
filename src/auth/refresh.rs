//! Single-flight access token refresh.
//!
//! Several requests can find the credential missing or rejected at nearly the
//! same moment (e.g. a dashboard loading a handful of widgets at once). Only one
//! `POST /refresh` may be outstanding at a time: the first caller starts the
//! attempt and parks it in the in-flight slot, later callers clone the same
//! shared future and await its outcome.
//!
//! Refresh failure is an ordinary outcome (the user may simply never have
//! logged in), so it is reported as `false` and never raised. A 401 from the
//! refresh endpoint is silent; anything else is logged.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use super::credential::CredentialStore;
use crate::models::token::TokenResponse;

type RefreshFuture = Shared<BoxFuture<'static, bool>>;

struct InFlight {
    generation: u64,
    attempt: RefreshFuture,
}

pub struct Refresher {
    http: Client,
    refresh_url: String,
    credentials: Arc<CredentialStore>,
    in_flight: Mutex<Option<InFlight>>,
    generation: AtomicU64,
}

impl Refresher {
    pub fn new(http: Client, refresh_url: impl Into<String>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            http,
            refresh_url: refresh_url.into(),
            credentials,
            in_flight: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True while a refresh attempt is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.slot().is_some()
    }

    /// Obtain a new access token, joining any refresh already in flight.
    ///
    /// Returns `true` when a fresh credential was stored.
    pub async fn refresh_token_if_needed(&self) -> bool {
        let (generation, attempt) = self.join_or_start();
        let refreshed = attempt.await;
        self.settle(generation);
        refreshed
    }

    /// Check-and-set of the in-flight slot. Runs entirely under the lock so no
    /// two callers can both decide to start an attempt.
    fn join_or_start(&self) -> (u64, RefreshFuture) {
        let mut slot = self.slot();
        if let Some(current) = slot.as_ref() {
            debug!(generation = current.generation, "joining in-flight token refresh");
            return (current.generation, current.attempt.clone());
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let attempt = do_refresh(
            self.http.clone(),
            self.refresh_url.clone(),
            self.credentials.clone(),
        )
        .boxed()
        .shared();

        *slot = Some(InFlight {
            generation,
            attempt: attempt.clone(),
        });
        (generation, attempt)
    }

    /// Clear the slot once its attempt has settled. A later generation that
    /// has already taken the slot is left alone.
    fn settle(&self, generation: u64) {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|f| f.generation == generation) {
            *slot = None;
        }
    }
}

async fn do_refresh(http: Client, url: String, credentials: Arc<CredentialStore>) -> bool {
    let resp = match http.post(&url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(error = %e, "token refresh request failed");
            credentials.clear();
            return false;
        }
    };

    let status = resp.status();
    if !status.is_success() {
        if status == StatusCode::UNAUTHORIZED {
            debug!("no valid refresh cookie, staying logged out");
        } else {
            warn!(%status, "token refresh rejected");
        }
        credentials.clear();
        return false;
    }

    match resp.json::<TokenResponse>().await {
        Ok(token) => {
            credentials.set(token.access_token, token.expires_in);
            info!(expires_in = token.expires_in, "access token refreshed");
            true
        }
        Err(e) => {
            warn!(error = %e, "token refresh returned an unreadable body");
            credentials.clear();
            false
        }
    }
}
