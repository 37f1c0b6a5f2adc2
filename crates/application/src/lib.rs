//! Application services and ports.

#![forbid(unsafe_code)]

mod media_service;
mod rate_limit_service;

pub use media_service::{MediaDirectory, MediaPoolService};
pub use rate_limit_service::{
    DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_SECONDS, RateLimitPolicy, RateLimitService,
    RateLimitStore, WindowSnapshot,
};
