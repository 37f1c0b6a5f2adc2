use std::any::Any;

use axum::Json;
use axum::Router;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ErrorResponse, GENERIC_ERROR_MESSAGE};
use crate::handlers;
use crate::handlers::home::{AUTHOR_GITHUB, AUTHOR_NAME, POWERED_BY};
use crate::middleware;
use crate::state::AppState;

/// Builds the service router.
///
/// The rate limiter is layered over the declared routes only, so an unknown
/// path is answered 404 regardless of quota state. The marker headers, trace
/// layer, and panic boundary wrap everything, fallback included.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home::home_handler))
        .route("/photo", get(handlers::media::photo_handler))
        .route("/gif", get(handlers::media::gif_handler))
        .route_layer(from_fn_with_state(state.clone(), middleware::rate_limit))
        .fallback(handlers::route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-powered-by"),
            HeaderValue::from_static(POWERED_BY),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-author"),
            HeaderValue::from_static(AUTHOR_NAME),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-github-repo"),
            HeaderValue::from_static(AUTHOR_GITHUB),
        ))
        .with_state(state)
}

/// Top-level fault boundary: a panic escaping a handler becomes a logged 500
/// response instead of tearing down the connection task.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("opaque panic payload");
    tracing::error!(detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(GENERIC_ERROR_MESSAGE)),
    )
        .into_response()
}

#[cfg(test)]
mod tests;
