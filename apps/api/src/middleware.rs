use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use randomavatars_core::ClientId;
use randomavatars_domain::{RateLimitDecision, RateLimitStatus};

use crate::error::{ApiResult, ErrorResponse};
use crate::state::AppState;

/// Body returned to clients whose quota is exhausted.
pub const RATE_LIMITED_MESSAGE: &str =
    "Too many requests from this IP, please try again after 15 minutes";

/// Identity used when neither a forwarding header nor peer address is known.
const UNKNOWN_CLIENT: &str = "unknown";

/// Admission-control middleware applied to every declared route.
///
/// A denied request is answered here without touching the media pools; an
/// admitted one continues into the handler and gets quota headers attached
/// on the way out.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let client = client_identity(&request);
    let decision = state.rate_limiter.admit(&client).await?;

    match decision {
        RateLimitDecision::Allowed(status) => {
            let mut response = next.run(request).await;
            apply_rate_limit_headers(response.headers_mut(), &status);
            Ok(response)
        }
        RateLimitDecision::Denied(status) => {
            tracing::debug!(client = %client, "request denied by rate limiter");

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse::new(RATE_LIMITED_MESSAGE)),
            )
                .into_response();
            apply_rate_limit_headers(response.headers_mut(), &status);
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(status.reset_after_seconds.unsigned_abs()),
            );

            Ok(response)
        }
    }
}

/// Resolves the identity quota is tracked against: the first
/// `x-forwarded-for` entry when present, else the peer address.
fn client_identity(request: &Request) -> ClientId {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(address) = forwarded {
        return ClientId::new(address);
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(
            || ClientId::new(UNKNOWN_CLIENT),
            |ConnectInfo(address)| ClientId::new(address.ip().to_string()),
        )
}

fn apply_rate_limit_headers(headers: &mut HeaderMap, status: &RateLimitStatus) {
    headers.insert(
        HeaderName::from_static("ratelimit-limit"),
        HeaderValue::from(status.limit),
    );
    headers.insert(
        HeaderName::from_static("ratelimit-remaining"),
        HeaderValue::from(status.remaining),
    );
    headers.insert(
        HeaderName::from_static("ratelimit-reset"),
        HeaderValue::from(status.reset_after_seconds.unsigned_abs()),
    );
}
