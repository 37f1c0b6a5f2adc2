//! RandomAvatars API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use randomavatars_application::{MediaDirectory, MediaPoolService, RateLimitService};
use randomavatars_core::AppError;
use randomavatars_domain::MediaKind;
use randomavatars_infrastructure::{FsMediaDirectory, InMemoryRateLimitStore};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api_config::ApiConfig;
use crate::api_router::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    // Both pools must exist before any traffic is accepted; a failure here
    // is fatal because the service has no valid mode of operation without
    // its media directories.
    let photo_directory = FsMediaDirectory::bootstrap(&config.photo_dir).await?;
    let gif_directory = FsMediaDirectory::bootstrap(&config.gif_dir).await?;
    info!(
        photo_dir = %photo_directory.root_path().display(),
        gif_dir = %gif_directory.root_path().display(),
        "media pools ready"
    );

    let rate_limiter = RateLimitService::new(
        config.rate_limit.clone(),
        Arc::new(InMemoryRateLimitStore::new()),
    );
    spawn_eviction_task(rate_limiter.clone());

    let state = AppState {
        photo_pool: MediaPoolService::new(MediaKind::Photo, Arc::new(photo_directory)),
        gif_pool: MediaPoolService::new(MediaKind::Gif, Arc::new(gif_directory)),
        rate_limiter,
    };

    let host = IpAddr::from_str(&config.api_host).map_err(|error| {
        AppError::Validation(format!("invalid API_HOST '{}': {error}", config.api_host))
    })?;
    let address = SocketAddr::from((host, config.api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        max_requests = config.rate_limit.max_requests(),
        window_seconds = config.rate_limit.window_seconds(),
        "randomavatars-api listening"
    );

    axum::serve(
        listener,
        build_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Periodically drops idle client windows so the limiter map does not grow
/// with every address ever seen. Admission correctness does not depend on
/// this task; the store resets expired windows inline.
fn spawn_eviction_task(rate_limiter: RateLimitService) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(rate_limiter.policy().window());
        // The first tick completes immediately; skip it.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match rate_limiter.evict_expired().await {
                Ok(evicted) if evicted > 0 => {
                    debug!(evicted, "dropped idle rate limit windows");
                }
                Ok(_) => {}
                Err(error) => warn!(%error, "rate limit eviction failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        return;
    }

    info!("shutdown signal received, stopping");
}
