use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use sea_orm::*;
use serde::Deserialize;
use serde_json::json;

use crate::auth::AdminClaims;
use crate::models::review::{self, Entity as Review, ReviewDto};
use crate::services::review_service;

use crate::api::respond;

#[derive(Debug, Deserialize)]
pub struct AdminReviewsQuery {
    pub seller_id: Option<i32>,
}

pub async fn list_reviews(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Query(params): Query<AdminReviewsQuery>,
) -> impl IntoResponse {
    let mut query = Review::find();

    if let Some(seller_id) = params.seller_id {
        query = query.filter(review::Column::SellerId.eq(seller_id));
    }

    match query
        .order_by_desc(review::Column::CreatedAt)
        .all(&db)
        .await
    {
        Ok(reviews) => {
            let dtos: Vec<ReviewDto> = reviews.into_iter().map(ReviewDto::from).collect();
            respond::ok(dtos)
        }
        Err(e) => respond::db_error(e),
    }
}

/// Removing a review recomputes the seller's aggregate in the same
/// transaction.
pub async fn delete_review(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match review_service::delete_review(&db, id).await {
        Ok(()) => respond::ok(json!({ "message": "Đã xóa đánh giá" })),
        Err(e) => respond::service_error(e),
    }
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    verified: bool,
}

pub async fn set_verified(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
    Json(payload): Json<VerifyRequest>,
) -> impl IntoResponse {
    match review_service::set_verified(&db, id, payload.verified).await {
        Ok(model) => respond::ok(ReviewDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}
