use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use sea_orm::*;
use serde::Deserialize;
use serde_json::json;

use crate::auth::AdminClaims;
use crate::models::acc::{self, Entity as Acc};
use crate::models::game::{self, Entity as Game, GameDto};
use crate::utils::slug::slugify;

use crate::api::respond;

/// Full catalog including inactive games, by sort order.
pub async fn list_games(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
) -> impl IntoResponse {
    match Game::find()
        .order_by_asc(game::Column::SortOrder)
        .all(&db)
        .await
    {
        Ok(games) => {
            let dtos: Vec<GameDto> = games.into_iter().map(GameDto::from).collect();
            respond::ok(dtos)
        }
        Err(e) => respond::db_error(e),
    }
}

#[derive(Deserialize)]
pub struct CreateGameRequest {
    name: String,
    icon: Option<String>,
    #[serde(default)]
    fields_schema: serde_json::Value,
    #[serde(default)]
    sort_order: i32,
}

pub async fn create_game(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Json(payload): Json<CreateGameRequest>,
) -> impl IntoResponse {
    let name = payload.name.trim();
    if name.is_empty() {
        return respond::error(StatusCode::BAD_REQUEST, "Tên game không được để trống");
    }

    let slug = slugify(name);
    match Game::find()
        .filter(game::Column::Slug.eq(slug.clone()))
        .one(&db)
        .await
    {
        Ok(Some(_)) => return respond::error(StatusCode::CONFLICT, "Game đã tồn tại"),
        Ok(None) => {}
        Err(e) => return respond::db_error(e),
    }

    let fields_schema = if payload.fields_schema.is_null() {
        "[]".to_string()
    } else {
        payload.fields_schema.to_string()
    };

    let now = Utc::now().to_rfc3339();
    let active = game::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slug),
        icon: Set(payload.icon),
        fields_schema: Set(fields_schema),
        is_active: Set(true),
        sort_order: Set(payload.sort_order),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    match active.insert(&db).await {
        Ok(model) => respond::created(GameDto::from(model)),
        Err(e) => respond::db_error(e),
    }
}

#[derive(Deserialize)]
pub struct UpdateGameRequest {
    name: Option<String>,
    icon: Option<String>,
    fields_schema: Option<serde_json::Value>,
    is_active: Option<bool>,
    sort_order: Option<i32>,
}

/// Partial update. The slug is stable; renaming a game does not
/// change its public URL.
pub async fn update_game(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateGameRequest>,
) -> impl IntoResponse {
    let model = match Game::find_by_id(id).one(&db).await {
        Ok(Some(model)) => model,
        Ok(None) => return respond::error(StatusCode::NOT_FOUND, "Game không tồn tại"),
        Err(e) => return respond::db_error(e),
    };

    let mut active: game::ActiveModel = model.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return respond::error(StatusCode::BAD_REQUEST, "Tên game không được để trống");
        }
        active.name = Set(name);
    }
    if let Some(icon) = payload.icon {
        active.icon = Set(Some(icon));
    }
    if let Some(schema) = payload.fields_schema {
        active.fields_schema = Set(schema.to_string());
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(sort_order) = payload.sort_order {
        active.sort_order = Set(sort_order);
    }
    active.updated_at = Set(Utc::now().to_rfc3339());

    match active.update(&db).await {
        Ok(updated) => respond::ok(GameDto::from(updated)),
        Err(e) => respond::db_error(e),
    }
}

/// Deletion is blocked while any listing references the game.
pub async fn delete_game(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let referenced = match Acc::find()
        .filter(acc::Column::GameId.eq(id))
        .count(&db)
        .await
    {
        Ok(count) => count,
        Err(e) => return respond::db_error(e),
    };
    if referenced > 0 {
        return respond::error(
            StatusCode::BAD_REQUEST,
            "Không thể xóa game đang có tài khoản",
        );
    }

    match Game::delete_by_id(id).exec(&db).await {
        Ok(res) if res.rows_affected > 0 => respond::ok(json!({ "message": "Đã xóa game" })),
        Ok(_) => respond::error(StatusCode::NOT_FOUND, "Game không tồn tại"),
        Err(e) => respond::db_error(e),
    }
}
