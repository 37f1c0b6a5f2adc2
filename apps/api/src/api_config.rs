use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use randomavatars_application::RateLimitPolicy;
use randomavatars_core::AppError;

/// Runtime configuration resolved from the process environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub photo_dir: PathBuf,
    pub gif_dir: PathBuf,
    pub rate_limit: RateLimitPolicy,
}

impl ApiConfig {
    /// Loads configuration, applying documented defaults for unset values.
    ///
    /// Present-but-invalid values are startup errors rather than silently
    /// falling back to defaults.
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_owned());
        let api_port = optional_env_parsed::<u16>("API_PORT")?.unwrap_or(3000);

        let photo_dir = env::var("PHOTO_DIR").unwrap_or_else(|_| "photos".to_owned());
        let gif_dir = env::var("GIF_DIR").unwrap_or_else(|_| "gifs".to_owned());

        let max_requests = optional_env_parsed::<u32>("RATE_LIMIT_MAX_REQUESTS")?
            .unwrap_or(randomavatars_application::DEFAULT_MAX_REQUESTS);
        let window_seconds = optional_env_parsed::<i64>("RATE_LIMIT_WINDOW_SECONDS")?
            .unwrap_or(randomavatars_application::DEFAULT_WINDOW_SECONDS);

        Ok(Self {
            api_host,
            api_port,
            photo_dir: PathBuf::from(photo_dir),
            gif_dir: PathBuf::from(gif_dir),
            rate_limit: RateLimitPolicy::new(max_requests, window_seconds)?,
        })
    }
}

fn optional_env_parsed<T>(name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
        })
        .transpose()
}
