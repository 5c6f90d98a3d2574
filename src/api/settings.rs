use axum::{extract::State, response::IntoResponse};
use chrono::Utc;
use sea_orm::*;

use crate::models::settings::{self, Entity as Settings, SETTINGS_ID};

use super::respond;

/// Fetch the singleton settings row, creating it with defaults on
/// first read.
pub async fn load_or_create(db: &DatabaseConnection) -> Result<settings::Model, DbErr> {
    if let Some(existing) = Settings::find_by_id(SETTINGS_ID).one(db).await? {
        return Ok(existing);
    }

    let defaults = settings::ActiveModel {
        id: Set(SETTINGS_ID.to_string()),
        contact_email: Set(None),
        contact_phone: Set(None),
        facebook_url: Set(None),
        zalo_url: Set(None),
        discord_url: Set(None),
        youtube_url: Set(None),
        telegram_url: Set(None),
        updated_at: Set(Utc::now().to_rfc3339()),
    };
    defaults.insert(db).await
}

pub async fn get_settings(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match load_or_create(&db).await {
        Ok(model) => respond::ok(model),
        Err(e) => respond::db_error(e),
    }
}
