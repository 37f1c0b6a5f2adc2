//! Rate limiting ports and application service.
//!
//! Implements fixed-window admission control: each client identity gets at
//! most `max_requests` admissions per epoch-aligned window. The store owns
//! the per-key counters and resolves each attempt atomically, so two racing
//! requests can never both take the last slot.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use randomavatars_core::{AppError, AppResult, ClientId};
use randomavatars_domain::{RateLimitDecision, RateLimitStatus};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Store port for per-client window counters.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Resolves one admission attempt for `client` at `now`.
    ///
    /// Must atomically (per key) open or reset the window covering `now` and
    /// count the attempt only while the counter is below the policy ceiling.
    async fn try_acquire(
        &self,
        client: &ClientId,
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> AppResult<WindowSnapshot>;

    /// Removes windows that started at or before the given cutoff.
    ///
    /// Returns the number of evicted entries. Purely a memory reclamation
    /// concern: `try_acquire` resets expired windows on its own.
    async fn evict_expired(&self, before: DateTime<Utc>) -> AppResult<u64>;
}

/// State of a client's window after one admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    /// Whether the attempt was counted.
    pub admitted: bool,
    /// Admissions counted in the window, including this one when admitted.
    pub count: u32,
    /// Aligned start of the window the attempt fell into.
    pub window_started_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Admissions allowed per window when not configured otherwise.
pub const DEFAULT_MAX_REQUESTS: u32 = 100;
/// Window length in seconds when not configured otherwise (15 minutes).
pub const DEFAULT_WINDOW_SECONDS: i64 = 900;

/// Validated fixed-window policy applied to every client identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    max_requests: u32,
    window_seconds: i64,
}

impl RateLimitPolicy {
    /// Creates a policy, rejecting non-positive limits or windows.
    pub fn new(max_requests: u32, window_seconds: i64) -> AppResult<Self> {
        if max_requests == 0 {
            return Err(AppError::Validation(
                "rate limit max_requests must be at least 1".to_owned(),
            ));
        }
        if window_seconds <= 0 {
            return Err(AppError::Validation(
                "rate limit window_seconds must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            max_requests,
            window_seconds,
        })
    }

    /// Admissions allowed per window.
    #[must_use]
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Window length in seconds.
    #[must_use]
    pub fn window_seconds(&self) -> i64 {
        self.window_seconds
    }

    /// Window length as a standard duration, for timers.
    #[must_use]
    pub fn window(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.window_seconds.unsigned_abs())
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window_seconds: DEFAULT_WINDOW_SECONDS,
        }
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for admission control.
///
/// A denial is a normal outcome carried in the returned decision; the
/// service only errors when the underlying store does.
#[derive(Clone)]
pub struct RateLimitService {
    policy: RateLimitPolicy,
    store: Arc<dyn RateLimitStore>,
}

impl RateLimitService {
    /// Creates a new rate limit service.
    #[must_use]
    pub fn new(policy: RateLimitPolicy, store: Arc<dyn RateLimitStore>) -> Self {
        Self { policy, store }
    }

    /// The policy this service enforces.
    #[must_use]
    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Decides admission for one request from `client` arriving now.
    pub async fn admit(&self, client: &ClientId) -> AppResult<RateLimitDecision> {
        self.admit_at(client, Utc::now()).await
    }

    /// Decides admission at an explicit instant.
    pub async fn admit_at(
        &self,
        client: &ClientId,
        now: DateTime<Utc>,
    ) -> AppResult<RateLimitDecision> {
        let snapshot = self.store.try_acquire(client, &self.policy, now).await?;

        let reset_at =
            snapshot.window_started_at + Duration::seconds(self.policy.window_seconds);
        let status = RateLimitStatus {
            limit: self.policy.max_requests,
            remaining: self.policy.max_requests.saturating_sub(snapshot.count),
            reset_at,
            reset_after_seconds: (reset_at - now).num_seconds().max(1),
        };

        Ok(if snapshot.admitted {
            RateLimitDecision::Allowed(status)
        } else {
            RateLimitDecision::Denied(status)
        })
    }

    /// Drops windows whose period has fully elapsed. Intended for a periodic
    /// cleanup task; admission correctness never depends on it running.
    pub async fn evict_expired(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::seconds(self.policy.window_seconds);
        self.store.evict_expired(cutoff).await
    }
}
