use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Service name reported by the home endpoint.
pub(crate) const SERVICE_NAME: &str = "RandomAvatars API";
/// Value of the `X-Powered-By` marker header.
pub(crate) const POWERED_BY: &str = "RandomAvatars";
/// Author reported in metadata and the `X-Author` header.
pub(crate) const AUTHOR_NAME: &str = "Turki";
/// Upstream repository reported in metadata and the `X-Github-Repo` header.
pub(crate) const AUTHOR_GITHUB: &str = "https://github.com/9de/avatarwebsite";

/// Service descriptor returned by the home endpoint.
#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    name: &'static str,
    version: &'static str,
    endpoints: EndpointDescriptions,
    rate_limit: RateLimitInfo,
    author: AuthorInfo,
}

#[derive(Debug, Serialize)]
struct EndpointDescriptions {
    photo: &'static str,
    gif: &'static str,
}

#[derive(Debug, Serialize)]
struct RateLimitInfo {
    max_requests: u32,
    window_seconds: i64,
}

#[derive(Debug, Serialize)]
struct AuthorInfo {
    name: &'static str,
    github: &'static str,
}

/// Describes the service, its endpoints, and the limiter configuration.
pub async fn home_handler(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    let policy = state.rate_limiter.policy();

    Json(ServiceInfoResponse {
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: EndpointDescriptions {
            photo: "/photo - Get random photo avatar",
            gif: "/gif - Get random GIF avatar",
        },
        rate_limit: RateLimitInfo {
            max_requests: policy.max_requests(),
            window_seconds: policy.window_seconds(),
        },
        author: AuthorInfo {
            name: AUTHOR_NAME,
            github: AUTHOR_GITHUB,
        },
    })
}
