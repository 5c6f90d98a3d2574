use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use sea_orm::*;

use crate::models::game::{self, Entity as Game, GameDto};

use super::respond;

pub async fn list_games(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    let result = Game::find()
        .filter(game::Column::IsActive.eq(true))
        .order_by_asc(game::Column::SortOrder)
        .all(&db)
        .await;

    match result {
        Ok(games) => {
            let dtos: Vec<GameDto> = games.into_iter().map(GameDto::from).collect();
            respond::ok(dtos)
        }
        Err(e) => respond::db_error(e),
    }
}

pub async fn get_game(
    State(db): State<DatabaseConnection>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match Game::find()
        .filter(game::Column::Slug.eq(&slug))
        .one(&db)
        .await
    {
        Ok(Some(model)) => respond::ok(GameDto::from(model)),
        Ok(None) => respond::error(
            axum::http::StatusCode::NOT_FOUND,
            "Game không tồn tại",
        ),
        Err(e) => respond::db_error(e),
    }
}
