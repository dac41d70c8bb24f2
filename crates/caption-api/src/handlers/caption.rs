//! Caption relay handler
//!
//! Takes the `image` field out of a multipart upload, forwards the bytes to
//! the backend and relays the upstream JSON body unchanged.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// POST /caption
/// Relay an uploaded image to the vision upstream
pub async fn caption(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut multipart = multipart?;

    let image = read_image_field(&mut multipart).await?.ok_or_else(|| {
        ApiError::MissingPayload(format!("No file uploaded in field '{}'", IMAGE_FIELD))
    })?;

    let size = image.len();
    let reply = state.backend().analyze(image).await?;

    tracing::info!(
        size,
        upstream_status = reply.status,
        response_size = reply.body.len(),
        "Caption relayed"
    );

    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        reply.body,
    )
        .into_response())
}

/// Return the bytes of the first `image` field; other fields are skipped.
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<Bytes>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            tracing::debug!(
                file_name = field.file_name().unwrap_or("-"),
                content_type = field.content_type().unwrap_or("-"),
                "Reading uploaded image"
            );
            return Ok(Some(field.bytes().await?));
        }
    }
    Ok(None)
}
