use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use sea_orm::*;
use serde::Deserialize;

use crate::models::review::{self, Entity as Review, ReviewDto};
use crate::services::review_service::{self, CreateReviewInput};

use super::respond;

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub seller_id: i32,
}

pub async fn list_reviews(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ReviewsQuery>,
) -> impl IntoResponse {
    let result = Review::find()
        .filter(review::Column::SellerId.eq(params.seller_id))
        .order_by_desc(review::Column::CreatedAt)
        .all(&db)
        .await;

    match result {
        Ok(reviews) => {
            let dtos: Vec<ReviewDto> = reviews.into_iter().map(ReviewDto::from).collect();
            respond::ok(dtos)
        }
        Err(e) => respond::db_error(e),
    }
}

pub async fn create_review(
    State(db): State<DatabaseConnection>,
    Json(input): Json<CreateReviewInput>,
) -> impl IntoResponse {
    match review_service::create_review(&db, input).await {
        Ok(model) => respond::created(ReviewDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}
