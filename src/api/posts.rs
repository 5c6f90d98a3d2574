use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Deserialize;

use crate::models::post::{self, Entity as Post, PostDto};

use super::respond;

#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    pub game: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

pub async fn list_posts(
    State(db): State<DatabaseConnection>,
    Query(params): Query<PostsQuery>,
) -> impl IntoResponse {
    let mut query = Post::find().filter(post::Column::Status.eq("PUBLISHED"));

    if let Some(game) = params.game.filter(|g| !g.trim().is_empty()) {
        query = query.filter(post::Column::Game.eq(game.trim()));
    }

    let result = query
        .order_by_desc(post::Column::PublishedAt)
        .limit(params.limit.unwrap_or(20).min(50))
        .offset(params.offset.unwrap_or(0))
        .all(&db)
        .await;

    match result {
        Ok(posts) => {
            let dtos: Vec<PostDto> = posts.into_iter().map(PostDto::summary).collect();
            respond::ok(dtos)
        }
        Err(e) => respond::db_error(e),
    }
}

/// Article detail. Post views are a plain counter, no dedup window.
pub async fn get_post(
    State(db): State<DatabaseConnection>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let found = match Post::find()
        .filter(post::Column::Slug.eq(&slug))
        .one(&db)
        .await
    {
        Ok(found) => found,
        Err(e) => return respond::db_error(e),
    };

    let model = match found {
        Some(model) if model.status == "PUBLISHED" => model,
        _ => return respond::error(StatusCode::NOT_FOUND, "Bài viết không tồn tại"),
    };

    if let Err(e) = Post::update_many()
        .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
        .filter(post::Column::Id.eq(model.id))
        .exec(&db)
        .await
    {
        return respond::db_error(e);
    }

    let mut dto = PostDto::from(model);
    dto.views += 1;
    respond::ok(dto)
}
