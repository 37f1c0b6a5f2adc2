//! Domain types for RandomAvatars: media pools and rate-limit windows.

#![forbid(unsafe_code)]

mod media;
mod rate_limit;

pub use media::{MediaKind, MediaSelection};
pub use rate_limit::{ClientWindow, RateLimitDecision, RateLimitStatus, window_start};
