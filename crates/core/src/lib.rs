//! Shared primitives for all Rust crates in RandomAvatars.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Result type used across RandomAvatars crates.
pub type AppResult<T> = Result<T, AppError>;

/// Identity a rate-limit quota is tracked against, typically the request's
/// source address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a client identity from an address-like string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    /// Returns the underlying identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ClientId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Media selection requested from a pool directory with no entries.
    #[error("empty pool: {0}")]
    EmptyPool(String),

    /// Pool directory missing or inaccessible at selection time.
    #[error("unreadable pool: {0}")]
    UnreadablePool(String),

    /// A selected file could not be opened or streamed to the client.
    #[error("transmission failure: {0}")]
    Transmission(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
