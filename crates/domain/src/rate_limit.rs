use chrono::{DateTime, Duration, Utc};

/// Returns the start of the fixed window containing `now`.
///
/// Windows are aligned to the Unix epoch: every instant with the same
/// `floor(epoch_seconds / window_seconds)` shares a window, so a counter
/// reset happens at the same wall-clock boundary for every client.
#[must_use]
pub fn window_start(now: DateTime<Utc>, window_seconds: i64) -> DateTime<Utc> {
    let window_seconds = window_seconds.max(1);
    let seconds = now.timestamp();
    let aligned = seconds - seconds.rem_euclid(window_seconds);
    DateTime::from_timestamp(aligned, 0).unwrap_or(now)
}

/// Per-client request counter for one fixed window.
///
/// The counter only moves through [`ClientWindow::try_admit`], which refuses
/// to increment past the configured ceiling; a rejected request is never
/// counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientWindow {
    count: u32,
    window_started_at: DateTime<Utc>,
}

impl ClientWindow {
    /// Opens an empty window for the period containing `now`.
    #[must_use]
    pub fn begin(now: DateTime<Utc>, window_seconds: i64) -> Self {
        Self {
            count: 0,
            window_started_at: window_start(now, window_seconds),
        }
    }

    /// Requests admitted so far in this window.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Aligned instant this window began.
    #[must_use]
    pub fn window_started_at(&self) -> DateTime<Utc> {
        self.window_started_at
    }

    /// Instant the window ends and the counter resets.
    #[must_use]
    pub fn reset_at(&self, window_seconds: i64) -> DateTime<Utc> {
        self.window_started_at + Duration::seconds(window_seconds.max(1))
    }

    /// Whether `now` falls in a later window than this counter covers.
    #[must_use]
    pub fn has_expired(&self, window_seconds: i64, now: DateTime<Utc>) -> bool {
        window_start(now, window_seconds) > self.window_started_at
    }

    /// Admits one request while the counter is below `max_requests`.
    ///
    /// Returns `true` and increments on admission; returns `false` and leaves
    /// the counter untouched once the ceiling is reached.
    pub fn try_admit(&mut self, max_requests: u32) -> bool {
        if self.count < max_requests {
            self.count += 1;
            return true;
        }

        false
    }
}

/// Quota metadata attached to every rate-limited response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Configured admissions per window.
    pub limit: u32,
    /// Admissions left in the current window.
    pub remaining: u32,
    /// Instant the current window resets.
    pub reset_at: DateTime<Utc>,
    /// Seconds until the reset, at least 1.
    pub reset_after_seconds: i64,
}

/// Outcome of an admission check. A denial is a normal outcome, not an
/// error; both arms carry the metadata used for response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request is within quota and has been counted.
    Allowed(RateLimitStatus),
    /// Request would exceed quota and was not counted.
    Denied(RateLimitStatus),
}

impl RateLimitDecision {
    /// Whether the request was admitted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// Quota metadata for response headers.
    #[must_use]
    pub fn status(&self) -> &RateLimitStatus {
        match self {
            Self::Allowed(status) | Self::Denied(status) => status,
        }
    }

    /// Seconds after which a denied client may retry.
    #[must_use]
    pub fn retry_after_seconds(&self) -> i64 {
        self.status().reset_after_seconds
    }
}
