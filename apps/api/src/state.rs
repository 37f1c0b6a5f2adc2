use randomavatars_application::{MediaPoolService, RateLimitService};

/// Shared application state.
///
/// Built once in `main` and handed to the router; the limiter is an owned
/// service here rather than process-global state so tests can build isolated
/// instances.
#[derive(Clone)]
pub struct AppState {
    pub photo_pool: MediaPoolService,
    pub gif_pool: MediaPoolService,
    pub rate_limiter: RateLimitService,
}
