pub mod home;
pub mod media;

use randomavatars_core::AppError;

use crate::error::ApiError;

/// Fallback for unmatched routes.
pub async fn route_not_found() -> ApiError {
    ApiError(AppError::NotFound("Route not found".to_owned()))
}
