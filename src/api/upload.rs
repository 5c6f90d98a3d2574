use axum::{extract::Multipart, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::auth::Claims;
use crate::modules::integrations::image_host::{self, ALLOWED_TYPES, MAX_UPLOAD_BYTES};

use super::respond;

// Request-body cap for the upload route: the 5MB image plus headroom
// for multipart framing. Axum's default 2MB limit would cut valid
// uploads off before the handler sees them.
pub const MAX_BODY_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// Accept one image in a multipart form and forward it to the image
/// host. Only jpeg/png/webp/gif up to 5MB are allowed through.
pub async fn upload_image(_claims: Claims, mut multipart: Multipart) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        if field.name() != Some("file") && field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_default();
        if !ALLOWED_TYPES.contains(&content_type.as_str()) {
            return respond::error(
                StatusCode::BAD_REQUEST,
                "Chỉ chấp nhận ảnh JPEG, PNG, WebP hoặc GIF",
            );
        }

        let filename = field
            .file_name()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "upload".to_string());

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(_) => {
                return respond::error(StatusCode::BAD_REQUEST, "Không đọc được dữ liệu ảnh")
            }
        };
        if data.len() > MAX_UPLOAD_BYTES {
            return respond::error(StatusCode::BAD_REQUEST, "Ảnh vượt quá dung lượng 5MB");
        }

        return match image_host::upload_image(data.to_vec(), &filename, &content_type).await {
            Ok(url) => respond::ok(json!({ "url": url })),
            Err(e) => {
                tracing::error!("Image upload failed: {}", e);
                respond::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Tải ảnh lên thất bại, vui lòng thử lại",
                )
            }
        };
    }

    respond::error(StatusCode::BAD_REQUEST, "Thiếu file ảnh")
}
