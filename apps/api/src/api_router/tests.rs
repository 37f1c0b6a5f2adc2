use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use tower::ServiceExt;

use randomavatars_application::{MediaPoolService, RateLimitPolicy, RateLimitService};
use randomavatars_domain::MediaKind;
use randomavatars_infrastructure::{FsMediaDirectory, InMemoryRateLimitStore};

use super::build_router;
use crate::state::AppState;

fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap_or_else(|error| panic!("failed to create temp dir: {error}"))
}

fn write_file(path: &Path, contents: &[u8]) {
    std::fs::write(path, contents)
        .unwrap_or_else(|error| panic!("failed to write '{}': {error}", path.display()));
}

async fn router_with(photo_dir: &Path, gif_dir: &Path, policy: RateLimitPolicy) -> Router {
    let photo_directory = FsMediaDirectory::bootstrap(photo_dir)
        .await
        .unwrap_or_else(|error| panic!("photo pool bootstrap failed: {error}"));
    let gif_directory = FsMediaDirectory::bootstrap(gif_dir)
        .await
        .unwrap_or_else(|error| panic!("gif pool bootstrap failed: {error}"));

    build_router(AppState {
        photo_pool: MediaPoolService::new(MediaKind::Photo, Arc::new(photo_directory)),
        gif_pool: MediaPoolService::new(MediaKind::Gif, Arc::new(gif_directory)),
        rate_limiter: RateLimitService::new(policy, Arc::new(InMemoryRateLimitStore::new())),
    })
}

fn policy(max_requests: u32, window_seconds: i64) -> RateLimitPolicy {
    RateLimitPolicy::new(max_requests, window_seconds).unwrap_or_else(|_| unreachable!())
}

async fn send(router: &Router, path: &str, client_address: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(path)
        .header("x-forwarded-for", client_address)
        .body(Body::empty())
        .unwrap_or_else(|_| unreachable!());

    router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|_| unreachable!())
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|error| panic!("failed to read response body: {error}"))
        .to_vec()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|error| panic!("response body is not JSON: {error}"))
}

fn header_value(response: &Response<Body>, name: &str) -> String {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

#[tokio::test]
async fn home_reports_service_metadata_and_marker_headers() {
    let photos = temp_dir();
    let gifs = temp_dir();
    let router = router_with(photos.path(), gifs.path(), policy(100, 900)).await;

    let response = send(&router, "/", "203.0.113.1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, "x-powered-by"), "RandomAvatars");
    assert_eq!(header_value(&response, "x-author"), "Turki");
    assert_eq!(header_value(&response, "ratelimit-limit"), "100");

    let body = body_json(response).await;
    assert_eq!(body["name"], "RandomAvatars API");
    assert_eq!(body["rate_limit"]["max_requests"], 100);
    assert_eq!(body["rate_limit"]["window_seconds"], 900);
    assert_eq!(body["author"]["name"], "Turki");
    assert!(body["endpoints"]["photo"].is_string());
    assert!(body["endpoints"]["gif"].is_string());
}

#[tokio::test]
async fn photo_requests_within_quota_stream_pool_files() {
    let photos = temp_dir();
    let gifs = temp_dir();
    write_file(&photos.path().join("a.png"), b"alpha-bytes");
    write_file(&photos.path().join("b.png"), b"beta-bytes");
    let router = router_with(photos.path(), gifs.path(), policy(3, 900)).await;

    for remaining in ["2", "1", "0"] {
        let response = send(&router, "/photo", "203.0.113.2").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_value(&response, header::CONTENT_TYPE.as_str()), "image/png");
        assert_eq!(header_value(&response, "ratelimit-remaining"), remaining);

        let body = body_bytes(response).await;
        assert!(body == b"alpha-bytes" || body == b"beta-bytes");
    }
}

#[tokio::test]
async fn exhausted_quota_returns_too_many_requests() {
    let photos = temp_dir();
    let gifs = temp_dir();
    write_file(&photos.path().join("a.png"), b"alpha-bytes");
    let router = router_with(photos.path(), gifs.path(), policy(2, 900)).await;

    for _ in 0..2 {
        let response = send(&router, "/photo", "203.0.113.3").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let denied = send(&router, "/photo", "203.0.113.3").await;
    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(header_value(&denied, "ratelimit-remaining"), "0");

    let retry_after = header_value(&denied, header::RETRY_AFTER.as_str());
    assert!(retry_after.parse::<u64>().is_ok_and(|seconds| seconds >= 1));

    let body = body_json(denied).await;
    assert_eq!(
        body["error"],
        "Too many requests from this IP, please try again after 15 minutes"
    );

    // Another address still has its own quota.
    let other = send(&router, "/photo", "198.51.100.9").await;
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn home_shares_the_uniform_rate_limit() {
    let photos = temp_dir();
    let gifs = temp_dir();
    write_file(&photos.path().join("a.png"), b"alpha-bytes");
    let router = router_with(photos.path(), gifs.path(), policy(1, 900)).await;

    let first = send(&router, "/photo", "203.0.113.4").await;
    assert_eq!(first.status(), StatusCode::OK);

    let denied_home = send(&router, "/", "203.0.113.4").await;
    assert_eq!(denied_home.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn unknown_routes_are_not_found_regardless_of_quota_state() {
    let photos = temp_dir();
    let gifs = temp_dir();
    write_file(&photos.path().join("a.png"), b"alpha-bytes");
    let router = router_with(photos.path(), gifs.path(), policy(1, 900)).await;

    let exhaust = send(&router, "/photo", "203.0.113.5").await;
    assert_eq!(exhaust.status(), StatusCode::OK);

    let missing = send(&router, "/unknown-path", "203.0.113.5").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(header_value(&missing, "x-powered-by"), "RandomAvatars");

    let body = body_json(missing).await;
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn deleted_pool_directory_surfaces_a_server_error() {
    let photos = temp_dir();
    let gifs = temp_dir();
    write_file(&gifs.path().join("party.gif"), b"gif-bytes");
    let router = router_with(photos.path(), gifs.path(), policy(10, 900)).await;

    std::fs::remove_dir_all(gifs.path())
        .unwrap_or_else(|error| panic!("failed to delete gif pool: {error}"));

    let response = send(&router, "/gif", "203.0.113.6").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to serve media file");
}

#[tokio::test]
async fn empty_pool_surfaces_a_server_error() {
    let photos = temp_dir();
    let gifs = temp_dir();
    let router = router_with(photos.path(), gifs.path(), policy(10, 900)).await;

    let response = send(&router, "/photo", "203.0.113.7").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to serve media file");
}

#[tokio::test]
async fn gif_pool_serves_gifs_with_the_matching_content_type() {
    let photos = temp_dir();
    let gifs = temp_dir();
    write_file(&gifs.path().join("party.gif"), b"gif-bytes");
    let router = router_with(photos.path(), gifs.path(), policy(10, 900)).await;

    let response = send(&router, "/gif", "203.0.113.8").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::CONTENT_TYPE.as_str()), "image/gif");
    assert_eq!(header_value(&response, header::CONTENT_LENGTH.as_str()), "9");

    let body = body_bytes(response).await;
    assert_eq!(body, b"gif-bytes");
}
