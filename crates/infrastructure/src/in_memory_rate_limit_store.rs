//! In-memory implementation of the rate limit store port.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use randomavatars_application::{RateLimitPolicy, RateLimitStore, WindowSnapshot};
use randomavatars_core::{AppResult, ClientId};
use randomavatars_domain::ClientWindow;

/// Process-local store mapping each client identity to its current window.
///
/// All counters live behind one mutex, so the read-check-increment in
/// `try_acquire` is atomic per call: two racing requests for the same client
/// serialize and cannot both take the last slot in a window.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<ClientId, ClientWindow>>,
}

impl InMemoryRateLimitStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn try_acquire(
        &self,
        client: &ClientId,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> AppResult<WindowSnapshot> {
        let mut windows = self.windows.lock().await;

        let window = windows
            .entry(client.clone())
            .or_insert_with(|| ClientWindow::begin(now, policy.window_seconds()));

        if window.has_expired(policy.window_seconds(), now) {
            *window = ClientWindow::begin(now, policy.window_seconds());
        }

        let admitted = window.try_admit(policy.max_requests());

        Ok(WindowSnapshot {
            admitted,
            count: window.count(),
            window_started_at: window.window_started_at(),
        })
    }

    async fn evict_expired(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let mut windows = self.windows.lock().await;

        let len_before = windows.len();
        windows.retain(|_, window| window.window_started_at() > before);

        Ok((len_before - windows.len()) as u64)
    }
}
