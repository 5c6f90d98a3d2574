use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use sea_orm::*;
use serde::Deserialize;

use crate::api::settings::load_or_create;
use crate::auth::AdminClaims;
use crate::models::settings;

use crate::api::respond;

pub async fn get_settings(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
) -> impl IntoResponse {
    match load_or_create(&db).await {
        Ok(model) => respond::ok(model),
        Err(e) => respond::db_error(e),
    }
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub facebook_url: Option<String>,
    pub zalo_url: Option<String>,
    pub discord_url: Option<String>,
    pub youtube_url: Option<String>,
    pub telegram_url: Option<String>,
}

/// Whole-document update of the singleton row. Absent fields clear
/// their stored values.
pub async fn update_settings(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Json(payload): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    let model = match load_or_create(&db).await {
        Ok(model) => model,
        Err(e) => return respond::db_error(e),
    };

    let mut active: settings::ActiveModel = model.into();
    active.contact_email = Set(payload.contact_email);
    active.contact_phone = Set(payload.contact_phone);
    active.facebook_url = Set(payload.facebook_url);
    active.zalo_url = Set(payload.zalo_url);
    active.discord_url = Set(payload.discord_url);
    active.youtube_url = Set(payload.youtube_url);
    active.telegram_url = Set(payload.telegram_url);
    active.updated_at = Set(Utc::now().to_rfc3339());

    match active.update(&db).await {
        Ok(updated) => respond::ok(updated),
        Err(e) => respond::db_error(e),
    }
}
