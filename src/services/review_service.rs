//! Reviews and the derived shop rating. The aggregate (mean of all
//! ratings, 5.0 when none) is recomputed inside the same transaction
//! as every review insert or delete.

use chrono::Utc;
use sea_orm::*;
use serde::Deserialize;

use super::ServiceError;
use crate::auth::invalidate_user_cache;
use crate::models::review::{self, Entity as Review};
use crate::models::user::{self, Entity as User};

#[derive(Debug, Deserialize)]
pub struct CreateReviewInput {
    pub seller_id: i32,
    pub rating: i32,
    pub content: Option<String>,
    pub buyer_name: String,
}

async fn recompute_rating<C: ConnectionTrait>(conn: &C, seller_id: i32) -> Result<(), DbErr> {
    let reviews = Review::find()
        .filter(review::Column::SellerId.eq(seller_id))
        .all(conn)
        .await?;

    let total = reviews.len() as i32;
    let rating = if reviews.is_empty() {
        5.0
    } else {
        reviews.iter().map(|r| r.rating as f64).sum::<f64>() / reviews.len() as f64
    };

    if let Some(seller) = User::find_by_id(seller_id).one(conn).await? {
        let email = seller.email.clone();
        let mut active: user::ActiveModel = seller.into();
        active.rating = Set(rating);
        active.total_reviews = Set(total);
        active.updated_at = Set(Utc::now().to_rfc3339());
        active.update(conn).await?;
        invalidate_user_cache(&email);
    }

    Ok(())
}

pub async fn create_review(
    db: &DatabaseConnection,
    input: CreateReviewInput,
) -> Result<review::Model, ServiceError> {
    if !(1..=5).contains(&input.rating) {
        return Err(ServiceError::Validation(
            "Điểm đánh giá phải từ 1 đến 5".to_string(),
        ));
    }
    if input.buyer_name.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Vui lòng nhập tên người mua".to_string(),
        ));
    }

    let seller = User::find_by_id(input.seller_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;
    if seller.shop_name.is_none() {
        return Err(ServiceError::NotFound);
    }

    let txn = db.begin().await?;

    let new_review = review::ActiveModel {
        rating: Set(input.rating),
        content: Set(input.content),
        buyer_name: Set(input.buyer_name.trim().to_string()),
        seller_id: Set(input.seller_id),
        is_verified: Set(false),
        created_at: Set(Utc::now().to_rfc3339()),
        ..Default::default()
    };
    let saved = new_review.insert(&txn).await?;

    recompute_rating(&txn, input.seller_id).await?;
    txn.commit().await?;

    Ok(saved)
}

pub async fn delete_review(db: &DatabaseConnection, review_id: i32) -> Result<(), ServiceError> {
    let existing = Review::find_by_id(review_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;
    let seller_id = existing.seller_id;

    let txn = db.begin().await?;
    Review::delete_by_id(review_id).exec(&txn).await?;
    recompute_rating(&txn, seller_id).await?;
    txn.commit().await?;

    Ok(())
}

pub async fn set_verified(
    db: &DatabaseConnection,
    review_id: i32,
    verified: bool,
) -> Result<review::Model, ServiceError> {
    let existing = Review::find_by_id(review_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let mut active: review::ActiveModel = existing.into();
    active.is_verified = Set(verified);

    Ok(active.update(db).await?)
}
