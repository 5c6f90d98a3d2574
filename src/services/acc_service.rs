//! Listing lifecycle: PENDING -> APPROVED -> SOLD, PENDING -> REJECTED,
//! REJECTED -> PENDING on seller re-edit. SOLD and REJECTED are otherwise
//! terminal; SOLD listings are immutable except for the admin unmark path.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Deserialize;

use super::ServiceError;
use crate::models::acc::{self, AccAttribute, Entity as Acc};
use crate::models::game::Entity as Game;
use crate::models::user::{self, Entity as User};
use crate::utils::slug::{slug_candidates, slugify};

pub const MIN_TITLE_CHARS: usize = 10;
pub const MIN_PRICE: i64 = 10_000;
pub const MAX_IMAGES: usize = 15;
pub const MIN_REJECT_REASON_CHARS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct CreateAccInput {
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub original_price: Option<i64>,
    pub game_id: i32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AccAttribute>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub images: Option<Vec<String>>,
    pub attributes: Option<Vec<AccAttribute>>,
}

fn validate_title(title: &str) -> Result<(), ServiceError> {
    if title.chars().count() < MIN_TITLE_CHARS {
        return Err(ServiceError::Validation(
            "Tiêu đề phải có ít nhất 10 ký tự".to_string(),
        ));
    }
    Ok(())
}

fn validate_price(price: i64) -> Result<(), ServiceError> {
    if price < MIN_PRICE {
        return Err(ServiceError::Validation(
            "Giá bán tối thiểu là 10.000đ".to_string(),
        ));
    }
    Ok(())
}

fn validate_images(images: &[String]) -> Result<(), ServiceError> {
    if images.len() > MAX_IMAGES {
        return Err(ServiceError::Validation(
            "Tối đa 15 ảnh cho mỗi tài khoản".to_string(),
        ));
    }
    Ok(())
}

/// Derive a unique slug for a listing title, suffixing -1, -2, ...
/// until no collision remains.
pub async fn unique_acc_slug(db: &DatabaseConnection, title: &str) -> Result<String, ServiceError> {
    let base = slugify(title);
    for candidate in slug_candidates(&base) {
        let taken = Acc::find()
            .filter(acc::Column::Slug.eq(&candidate))
            .count(db)
            .await?;
        if taken == 0 {
            return Ok(candidate);
        }
    }
    unreachable!("slug_candidates is infinite")
}

/// Create a listing. Shop-level moderation substitutes for per-listing
/// review: a listing from an APPROVED shop goes straight to APPROVED.
pub async fn create_acc(
    db: &DatabaseConnection,
    seller: &user::Model,
    input: CreateAccInput,
) -> Result<acc::Model, ServiceError> {
    if seller.shop_name.is_none() || seller.status != "APPROVED" {
        return Err(ServiceError::Forbidden(
            "Shop của bạn chưa được duyệt".to_string(),
        ));
    }

    validate_title(&input.title)?;
    validate_price(input.price)?;
    validate_images(&input.images)?;

    let game = Game::find_by_id(input.game_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::Validation("Game không tồn tại".to_string()))?;
    if !game.is_active {
        return Err(ServiceError::Validation(
            "Game này đã ngừng nhận đăng bán".to_string(),
        ));
    }

    let slug = unique_acc_slug(db, &input.title).await?;
    let now = Utc::now().to_rfc3339();

    let new_acc = acc::ActiveModel {
        title: Set(input.title),
        slug: Set(slug),
        description: Set(input.description),
        price: Set(input.price),
        original_price: Set(input.original_price),
        game_id: Set(input.game_id),
        seller_id: Set(seller.id),
        images: Set(serde_json::to_string(&input.images).unwrap_or_else(|_| "[]".to_string())),
        attributes: Set(
            serde_json::to_string(&input.attributes).unwrap_or_else(|_| "[]".to_string())
        ),
        status: Set("APPROVED".to_string()),
        views: Set(0),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        approved_at: Set(Some(now)),
        ..Default::default()
    };

    Ok(new_acc.insert(db).await?)
}

/// Seller edit. Disallowed when SOLD; a REJECTED listing re-enters
/// moderation (PENDING, admin note cleared).
pub async fn update_acc(
    db: &DatabaseConnection,
    seller_id: i32,
    acc_id: i32,
    input: UpdateAccInput,
) -> Result<acc::Model, ServiceError> {
    let existing = Acc::find_by_id(acc_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if existing.seller_id != seller_id {
        return Err(ServiceError::Forbidden(
            "Bạn không có quyền sửa tài khoản này".to_string(),
        ));
    }
    if existing.status == "SOLD" {
        return Err(ServiceError::InvalidState(
            "Tài khoản đã bán, không thể chỉnh sửa".to_string(),
        ));
    }

    if let Some(ref title) = input.title {
        validate_title(title)?;
    }
    if let Some(price) = input.price {
        validate_price(price)?;
    }
    if let Some(ref images) = input.images {
        validate_images(images)?;
    }

    let was_rejected = existing.status == "REJECTED";
    let mut active: acc::ActiveModel = existing.into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = input.price {
        active.price = Set(price);
    }
    if let Some(original_price) = input.original_price {
        active.original_price = Set(Some(original_price));
    }
    if let Some(images) = input.images {
        active.images = Set(serde_json::to_string(&images).unwrap_or_else(|_| "[]".to_string()));
    }
    if let Some(attributes) = input.attributes {
        active.attributes =
            Set(serde_json::to_string(&attributes).unwrap_or_else(|_| "[]".to_string()));
    }
    if was_rejected {
        active.status = Set("PENDING".to_string());
        active.admin_note = Set(None);
    }
    active.updated_at = Set(Utc::now().to_rfc3339());

    Ok(active.update(db).await?)
}

/// Seller delete, blocked once sold.
pub async fn delete_acc(
    db: &DatabaseConnection,
    seller_id: i32,
    acc_id: i32,
) -> Result<(), ServiceError> {
    let existing = Acc::find_by_id(acc_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if existing.seller_id != seller_id {
        return Err(ServiceError::Forbidden(
            "Bạn không có quyền xóa tài khoản này".to_string(),
        ));
    }
    if existing.status == "SOLD" {
        return Err(ServiceError::InvalidState(
            "Tài khoản đã bán, không thể xóa".to_string(),
        ));
    }

    Acc::delete_by_id(acc_id).exec(db).await?;
    Ok(())
}

/// Mark a listing sold. The status flip and the seller's sales counter
/// move in one transaction so they never diverge.
pub async fn mark_sold(
    db: &DatabaseConnection,
    seller_id: i32,
    acc_id: i32,
) -> Result<acc::Model, ServiceError> {
    let existing = Acc::find_by_id(acc_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if existing.seller_id != seller_id {
        return Err(ServiceError::Forbidden(
            "Bạn không có quyền cập nhật tài khoản này".to_string(),
        ));
    }
    if existing.status != "APPROVED" {
        return Err(ServiceError::InvalidState(
            "Chỉ tài khoản đang bán mới có thể đánh dấu đã bán".to_string(),
        ));
    }

    let now = Utc::now().to_rfc3339();
    let txn = db.begin().await?;

    let mut active: acc::ActiveModel = existing.into();
    active.status = Set("SOLD".to_string());
    active.sold_at = Set(Some(now.clone()));
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    User::update_many()
        .col_expr(
            user::Column::TotalSales,
            Expr::col(user::Column::TotalSales).add(1),
        )
        .filter(user::Column::Id.eq(seller_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(updated)
}

/// Admin-only reversal of a sale: SOLD -> APPROVED and the sales
/// counter steps back down, atomically.
pub async fn unmark_sold(db: &DatabaseConnection, acc_id: i32) -> Result<acc::Model, ServiceError> {
    let existing = Acc::find_by_id(acc_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if existing.status != "SOLD" {
        return Err(ServiceError::InvalidState(
            "Tài khoản này chưa được đánh dấu đã bán".to_string(),
        ));
    }

    let seller_id = existing.seller_id;
    let txn = db.begin().await?;

    let mut active: acc::ActiveModel = existing.into();
    active.status = Set("APPROVED".to_string());
    active.sold_at = Set(None);
    active.updated_at = Set(Utc::now().to_rfc3339());
    let updated = active.update(&txn).await?;

    User::update_many()
        .col_expr(
            user::Column::TotalSales,
            Expr::col(user::Column::TotalSales).sub(1),
        )
        .filter(user::Column::Id.eq(seller_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(updated)
}

/// Admin approve. Requires the owning shop itself to be APPROVED.
pub async fn admin_approve(
    db: &DatabaseConnection,
    acc_id: i32,
) -> Result<acc::Model, ServiceError> {
    let existing = Acc::find_by_id(acc_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let seller = User::find_by_id(existing.seller_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;
    if seller.status != "APPROVED" {
        return Err(ServiceError::InvalidState(
            "Shop của người bán chưa được duyệt".to_string(),
        ));
    }

    let now = Utc::now().to_rfc3339();
    let mut active: acc::ActiveModel = existing.into();
    active.status = Set("APPROVED".to_string());
    active.approved_at = Set(Some(now.clone()));
    active.admin_note = Set(None);
    active.updated_at = Set(now);

    Ok(active.update(db).await?)
}

/// Admin reject with a mandatory reason (stored in admin_note).
pub async fn admin_reject(
    db: &DatabaseConnection,
    acc_id: i32,
    reason: &str,
) -> Result<acc::Model, ServiceError> {
    if reason.chars().count() < MIN_REJECT_REASON_CHARS {
        return Err(ServiceError::Validation(
            "Lý do từ chối phải có ít nhất 5 ký tự".to_string(),
        ));
    }

    let existing = Acc::find_by_id(acc_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let mut active: acc::ActiveModel = existing.into();
    active.status = Set("REJECTED".to_string());
    active.admin_note = Set(Some(reason.to_string()));
    active.updated_at = Set(Utc::now().to_rfc3339());

    Ok(active.update(db).await?)
}
