use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse};
use sea_orm::DatabaseConnection;
use std::env;

use crate::modules::ingest;

use super::respond;

/// Externally scheduled news pull, guarded by a bearer secret.
pub async fn ingest_news(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let secret = match env::var("CRON_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            tracing::error!("CRON_SECRET is not configured");
            return respond::error(StatusCode::UNAUTHORIZED, "Cron secret chưa được cấu hình");
        }
    };

    let authorized = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .map(|h| h == format!("Bearer {}", secret))
        .unwrap_or(false);
    if !authorized {
        return respond::error(StatusCode::UNAUTHORIZED, "Sai cron secret");
    }

    let summary = ingest::ingest_feeds(&db).await;
    respond::ok(summary)
}
