use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use sea_orm::*;
use serde::Deserialize;
use serde_json::json;

use crate::auth::AdminClaims;
use crate::models::post::{self, Entity as Post, PostDto};
use crate::modules::ingest;

use crate::api::respond;

#[derive(Debug, Deserialize)]
pub struct AdminPostsQuery {
    pub status: Option<String>,
}

pub async fn list_posts(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Query(params): Query<AdminPostsQuery>,
) -> impl IntoResponse {
    let mut query = Post::find();

    if let Some(status) = params.status {
        query = query.filter(post::Column::Status.eq(status));
    }

    match query.order_by_desc(post::Column::CreatedAt).all(&db).await {
        Ok(posts) => {
            let dtos: Vec<PostDto> = posts.into_iter().map(PostDto::summary).collect();
            respond::ok(dtos)
        }
        Err(e) => respond::db_error(e),
    }
}

pub async fn get_post(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match Post::find_by_id(id).one(&db).await {
        Ok(Some(model)) => respond::ok(PostDto::from(model)),
        Ok(None) => respond::error(StatusCode::NOT_FOUND, "Bài viết không tồn tại"),
        Err(e) => respond::db_error(e),
    }
}

/// DRAFT to PUBLISHED, stamping published_at. Publishing an already
/// published post is a no-op rejection.
pub async fn publish_post(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let model = match Post::find_by_id(id).one(&db).await {
        Ok(Some(model)) => model,
        Ok(None) => return respond::error(StatusCode::NOT_FOUND, "Bài viết không tồn tại"),
        Err(e) => return respond::db_error(e),
    };

    if model.status == "PUBLISHED" {
        return respond::error(StatusCode::BAD_REQUEST, "Bài viết đã được đăng");
    }

    let now = Utc::now().to_rfc3339();
    let mut active: post::ActiveModel = model.into();
    active.status = Set("PUBLISHED".to_string());
    active.published_at = Set(Some(now.clone()));
    active.updated_at = Set(now);

    match active.update(&db).await {
        Ok(updated) => respond::ok(PostDto::from(updated)),
        Err(e) => respond::db_error(e),
    }
}

pub async fn reject_post(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let model = match Post::find_by_id(id).one(&db).await {
        Ok(Some(model)) => model,
        Ok(None) => return respond::error(StatusCode::NOT_FOUND, "Bài viết không tồn tại"),
        Err(e) => return respond::db_error(e),
    };

    let mut active: post::ActiveModel = model.into();
    active.status = Set("REJECTED".to_string());
    active.published_at = Set(None);
    active.updated_at = Set(Utc::now().to_rfc3339());

    match active.update(&db).await {
        Ok(updated) => respond::ok(PostDto::from(updated)),
        Err(e) => respond::db_error(e),
    }
}

pub async fn delete_post(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match Post::delete_by_id(id).exec(&db).await {
        Ok(res) if res.rows_affected > 0 => {
            respond::ok(json!({ "message": "Đã xóa bài viết" }))
        }
        Ok(_) => respond::error(StatusCode::NOT_FOUND, "Bài viết không tồn tại"),
        Err(e) => respond::db_error(e),
    }
}

#[derive(Deserialize)]
pub struct ImportRequest {
    url: String,
}

/// Manual single-article import by URL. Scrapes the page and stores
/// the result as a DRAFT for review.
pub async fn import_post(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Json(payload): Json<ImportRequest>,
) -> impl IntoResponse {
    match ingest::import_article(&db, &payload.url).await {
        Ok(model) => respond::created(PostDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}
