//! Voyager session state: lazy creation, snapshot reads, explicit reset.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::client::LinkedinClient;
use crate::error::LinkedinError;

/// One process-wide Voyager session.
///
/// Created lazily by the first request, shared by all subsequent requests,
/// and never refreshed proactively; only [`LinkedinClient::reset`] discards
/// it. The CSRF token may be empty when the handshake did not yield a
/// `JSESSIONID` cookie; Voyager accepts some read endpoints without it.
#[derive(Debug)]
pub struct Session {
    pub csrf_token: String,
    pub created_at: DateTime<Utc>,
}

impl LinkedinClient {
    /// Returns the current session, performing the handshake if none exists.
    ///
    /// Readers take an `Arc` snapshot under a read lock; only the one caller
    /// that finds no session takes the write lock and performs the handshake,
    /// so concurrent fetches never re-run initialization.
    pub(crate) async fn ensure_session(&self) -> Result<Arc<Session>, LinkedinError> {
        if let Some(session) = self.session().read().await.as_ref() {
            return Ok(Arc::clone(session));
        }

        let mut guard = self.session().write().await;
        // Another caller may have initialized while we waited for the lock.
        if let Some(session) = guard.as_ref() {
            return Ok(Arc::clone(session));
        }

        let session = Arc::new(self.handshake().await?);
        *guard = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Discards the current session. The next request performs a fresh
    /// handshake. Waits for in-flight snapshot handouts to finish; requests
    /// already holding a snapshot keep using it.
    pub async fn reset(&self) {
        let mut guard = self.session().write().await;
        *guard = None;
        tracing::info!("voyager session reset");
    }

    /// Non-blocking health check: `true` once a session exists. Returns
    /// `false` while initialization holds the write lock.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.session()
            .try_read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}
