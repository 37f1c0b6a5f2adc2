use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use randomavatars_application::MediaPoolService;
use randomavatars_core::AppError;
use tokio_util::io::ReaderStream;

use crate::error::ApiResult;
use crate::state::AppState;

/// Streams a random file from the photo pool.
pub async fn photo_handler(State(state): State<AppState>) -> ApiResult<Response> {
    serve_random(&state.photo_pool).await
}

/// Streams a random file from the gif pool.
pub async fn gif_handler(State(state): State<AppState>) -> ApiResult<Response> {
    serve_random(&state.gif_pool).await
}

async fn serve_random(pool: &MediaPoolService) -> ApiResult<Response> {
    let selection = pool.pick().await?;

    // The file can disappear between listing and open; that is a
    // transmission failure, not a pool failure.
    let file = tokio::fs::File::open(selection.absolute_path())
        .await
        .map_err(|error| {
            AppError::Transmission(format!(
                "failed to open '{}': {error}",
                selection.absolute_path().display()
            ))
        })?;

    let content_length = file.metadata().await.ok().map(|metadata| metadata.len());
    let body = Body::from_stream(ReaderStream::new(file));

    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type_for(selection.file_name()))],
        body,
    )
        .into_response();

    if let Some(length) = content_length {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }

    tracing::debug!(file = selection.file_name(), pool = %pool.kind(), "serving media file");
    Ok(response)
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("apng") => "image/apng",
        Some("avif") => "image/avif",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::content_type_for;

    #[test]
    fn content_type_follows_the_extension() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("party.GIF"), "image/gif");
        assert_eq!(content_type_for("photo.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("clip.webm"), "video/webm");
    }

    #[test]
    fn unknown_extensions_fall_back_to_octet_stream() {
        assert_eq!(content_type_for("noext"), "application/octet-stream");
        assert_eq!(content_type_for("archive.tar.xz"), "application/octet-stream");
    }
}
