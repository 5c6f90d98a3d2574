//! External image host client. Uploads are forwarded as-is; the host
//! handles resizing/CDN concerns and hands back a public URL.

use std::env;

pub const ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub async fn upload_image(
    bytes: Vec<u8>,
    filename: &str,
    content_type: &str,
) -> Result<String, String> {
    let url = env::var("IMAGE_HOST_URL").map_err(|_| "IMAGE_HOST_URL not configured".to_string())?;
    let key = env::var("IMAGE_HOST_KEY").unwrap_or_default();

    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str(content_type)
        .map_err(|e| e.to_string())?;
    let form = reqwest::multipart::Form::new()
        .text("key", key)
        .part("image", part);

    let client = reqwest::Client::new();
    let res = client
        .post(&url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
        return Err(format!("Image host error: {}", res.status()));
    }

    let body: serde_json::Value = res.json().await.map_err(|e| e.to_string())?;
    body["data"]["url"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| "Image host response missing data.url".to_string())
}
