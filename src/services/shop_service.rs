//! Shop lifecycle: PENDING -> APPROVED -> {REJECTED, BANNED}; any non-BANNED
//! state can be banned, and a ban is terminal in-app. The identity record
//! survives a ban so the email cannot re-register.

use chrono::{DateTime, Duration, Utc};
use sea_orm::*;
use serde::Deserialize;

use super::ServiceError;
use crate::auth::invalidate_user_cache;
use crate::models::user::{self, Entity as User};
use crate::utils::slug::{slug_candidates, slugify};

pub const DEFAULT_COMMISSION_RATE: f64 = 5.0;
pub const VIP_COMMISSION_RATE: f64 = 3.0;
pub const MAX_FEATURED_GAMES: usize = 3;
pub const VIP_DURATIONS_DAYS: [i64; 4] = [30, 90, 180, 365];

#[derive(Debug, Deserialize)]
pub struct CreateShopInput {
    pub shop_name: String,
    pub shop_description: Option<String>,
    pub shop_avatar: Option<String>,
    pub shop_cover: Option<String>,
    #[serde(default)]
    pub featured_games: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateShopInput {
    pub shop_description: Option<String>,
    pub shop_avatar: Option<String>,
    pub shop_cover: Option<String>,
    pub featured_games: Option<Vec<String>>,
    pub avatar: Option<String>,
    pub name: Option<String>,
}

fn validate_featured_games(games: &[String]) -> Result<(), ServiceError> {
    if games.len() > MAX_FEATURED_GAMES {
        return Err(ServiceError::Validation(
            "Chỉ được chọn tối đa 3 game nổi bật".to_string(),
        ));
    }
    Ok(())
}

async fn unique_shop_slug(db: &DatabaseConnection, name: &str) -> Result<String, ServiceError> {
    let base = slugify(name);
    for candidate in slug_candidates(&base) {
        let taken = User::find()
            .filter(user::Column::ShopSlug.eq(&candidate))
            .count(db)
            .await?;
        if taken == 0 {
            return Ok(candidate);
        }
    }
    unreachable!("slug_candidates is infinite")
}

/// One-time shop creation on an existing user record. Rejected if shop
/// fields are already populated; a banned identity cannot open a shop.
pub async fn create_shop(
    db: &DatabaseConnection,
    user_model: user::Model,
    input: CreateShopInput,
) -> Result<user::Model, ServiceError> {
    if user_model.status == "BANNED" {
        return Err(ServiceError::Forbidden(
            "Tài khoản đã bị khóa, không thể tạo shop".to_string(),
        ));
    }
    if user_model.shop_name.is_some() {
        return Err(ServiceError::InvalidState(
            "Bạn đã có shop, không thể tạo thêm".to_string(),
        ));
    }
    if input.shop_name.trim().chars().count() < 3 {
        return Err(ServiceError::Validation(
            "Tên shop phải có ít nhất 3 ký tự".to_string(),
        ));
    }
    validate_featured_games(&input.featured_games)?;

    let slug = unique_shop_slug(db, &input.shop_name).await?;
    let email = user_model.email.clone();
    let now = Utc::now().to_rfc3339();

    let mut active: user::ActiveModel = user_model.into();
    active.shop_name = Set(Some(input.shop_name.trim().to_string()));
    active.shop_slug = Set(Some(slug));
    active.shop_description = Set(input.shop_description);
    active.shop_avatar = Set(input.shop_avatar);
    active.shop_cover = Set(input.shop_cover);
    active.featured_games = Set(Some(
        serde_json::to_string(&input.featured_games).unwrap_or_else(|_| "[]".to_string()),
    ));
    active.status = Set("PENDING".to_string());
    active.updated_at = Set(now);

    let updated = active.update(db).await?;
    invalidate_user_cache(&email);
    Ok(updated)
}

/// Seller-side profile edits on an existing shop.
pub async fn update_shop_profile(
    db: &DatabaseConnection,
    user_model: user::Model,
    input: UpdateShopInput,
) -> Result<user::Model, ServiceError> {
    if user_model.shop_name.is_none() {
        return Err(ServiceError::InvalidState(
            "Bạn chưa tạo shop".to_string(),
        ));
    }

    if let Some(ref games) = input.featured_games {
        validate_featured_games(games)?;
    }

    let email = user_model.email.clone();
    let mut active: user::ActiveModel = user_model.into();

    if let Some(description) = input.shop_description {
        active.shop_description = Set(Some(description));
    }
    if let Some(shop_avatar) = input.shop_avatar {
        active.shop_avatar = Set(Some(shop_avatar));
    }
    if let Some(shop_cover) = input.shop_cover {
        active.shop_cover = Set(Some(shop_cover));
    }
    if let Some(games) = input.featured_games {
        active.featured_games = Set(Some(
            serde_json::to_string(&games).unwrap_or_else(|_| "[]".to_string()),
        ));
    }
    if let Some(avatar) = input.avatar {
        active.avatar = Set(Some(avatar));
    }
    if let Some(name) = input.name {
        active.name = Set(name);
    }
    active.updated_at = Set(Utc::now().to_rfc3339());

    let updated = active.update(db).await?;
    invalidate_user_cache(&email);
    Ok(updated)
}

/// Approve a shop: verified badge plus approval timestamp.
pub async fn approve_shop(db: &DatabaseConnection, user_id: i32) -> Result<user::Model, ServiceError> {
    let user_model = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if user_model.status == "BANNED" {
        return Err(ServiceError::InvalidState(
            "Shop đã bị khóa vĩnh viễn".to_string(),
        ));
    }
    if user_model.shop_name.is_none() {
        return Err(ServiceError::InvalidState(
            "Người dùng này chưa tạo shop".to_string(),
        ));
    }

    let email = user_model.email.clone();
    let now = Utc::now().to_rfc3339();
    let mut active: user::ActiveModel = user_model.into();
    active.status = Set("APPROVED".to_string());
    active.is_verified = Set(true);
    active.approved_at = Set(Some(now.clone()));
    active.updated_at = Set(now);

    let updated = active.update(db).await?;
    invalidate_user_cache(&email);
    Ok(updated)
}

pub async fn reject_shop(db: &DatabaseConnection, user_id: i32) -> Result<user::Model, ServiceError> {
    let user_model = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if user_model.status == "BANNED" {
        return Err(ServiceError::InvalidState(
            "Shop đã bị khóa vĩnh viễn".to_string(),
        ));
    }

    let email = user_model.email.clone();
    let mut active: user::ActiveModel = user_model.into();
    active.status = Set("REJECTED".to_string());
    active.is_verified = Set(false);
    active.updated_at = Set(Utc::now().to_rfc3339());

    let updated = active.update(db).await?;
    invalidate_user_cache(&email);
    Ok(updated)
}

/// Ban wipes every shop-identifying field and resets the commission rate,
/// returning the record to a non-shop state while the banned identity
/// persists to block re-registration under the same email.
pub async fn ban_shop(db: &DatabaseConnection, user_id: i32) -> Result<user::Model, ServiceError> {
    let user_model = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if user_model.status == "BANNED" {
        return Err(ServiceError::InvalidState(
            "Shop này đã bị khóa".to_string(),
        ));
    }

    let email = user_model.email.clone();
    let mut active: user::ActiveModel = user_model.into();
    active.status = Set("BANNED".to_string());
    active.shop_name = Set(None);
    active.shop_slug = Set(None);
    active.shop_description = Set(None);
    active.shop_avatar = Set(None);
    active.shop_cover = Set(None);
    active.featured_games = Set(None);
    active.is_verified = Set(false);
    active.is_vip_shop = Set(false);
    active.vip_shop_end_time = Set(None);
    active.is_strategic_partner = Set(false);
    active.partner_tier = Set(None);
    active.partner_since = Set(None);
    active.commission_rate = Set(DEFAULT_COMMISSION_RATE);
    active.updated_at = Set(Utc::now().to_rfc3339());

    let updated = active.update(db).await?;
    invalidate_user_cache(&email);
    Ok(updated)
}

/// Grant VIP for one of the fixed durations. Days stack onto an existing
/// unexpired window; commission drops to the VIP rate.
pub async fn set_vip(
    db: &DatabaseConnection,
    user_id: i32,
    days: i64,
) -> Result<user::Model, ServiceError> {
    if !VIP_DURATIONS_DAYS.contains(&days) {
        return Err(ServiceError::Validation(
            "Thời hạn VIP phải là 30, 90, 180 hoặc 365 ngày".to_string(),
        ));
    }

    let user_model = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if user_model.status == "BANNED" {
        return Err(ServiceError::InvalidState(
            "Shop đã bị khóa vĩnh viễn".to_string(),
        ));
    }

    let now = Utc::now();
    let base = user_model
        .vip_shop_end_time
        .as_deref()
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc))
        .filter(|t| *t > now)
        .unwrap_or(now);
    let end = base + Duration::days(days);

    let email = user_model.email.clone();
    let is_partner = user_model.is_strategic_partner;
    let mut active: user::ActiveModel = user_model.into();
    active.is_vip_shop = Set(true);
    active.vip_shop_end_time = Set(Some(end.to_rfc3339()));
    if !is_partner {
        // Partner rates are negotiated and take precedence
        active.commission_rate = Set(VIP_COMMISSION_RATE);
    }
    active.updated_at = Set(now.to_rfc3339());

    let updated = active.update(db).await?;
    invalidate_user_cache(&email);
    Ok(updated)
}

pub async fn unset_vip(db: &DatabaseConnection, user_id: i32) -> Result<user::Model, ServiceError> {
    let user_model = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let email = user_model.email.clone();
    let is_partner = user_model.is_strategic_partner;
    let mut active: user::ActiveModel = user_model.into();
    active.is_vip_shop = Set(false);
    active.vip_shop_end_time = Set(None);
    if !is_partner {
        active.commission_rate = Set(DEFAULT_COMMISSION_RATE);
    }
    active.updated_at = Set(Utc::now().to_rfc3339());

    let updated = active.update(db).await?;
    invalidate_user_cache(&email);
    Ok(updated)
}

/// Strategic partner toggle with an explicitly negotiated commission rate.
pub async fn set_partner(
    db: &DatabaseConnection,
    user_id: i32,
    tier: String,
    commission_rate: f64,
) -> Result<user::Model, ServiceError> {
    if !(0.0..=5.0).contains(&commission_rate) {
        return Err(ServiceError::Validation(
            "Phí hoa hồng đối tác phải nằm trong khoảng 0-5%".to_string(),
        ));
    }

    let user_model = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if user_model.status == "BANNED" {
        return Err(ServiceError::InvalidState(
            "Shop đã bị khóa vĩnh viễn".to_string(),
        ));
    }

    let email = user_model.email.clone();
    let now = Utc::now().to_rfc3339();
    let mut active: user::ActiveModel = user_model.into();
    active.is_strategic_partner = Set(true);
    active.partner_tier = Set(Some(tier));
    active.partner_since = Set(Some(now.clone()));
    active.commission_rate = Set(commission_rate);
    active.updated_at = Set(now);

    let updated = active.update(db).await?;
    invalidate_user_cache(&email);
    Ok(updated)
}

pub async fn unset_partner(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<user::Model, ServiceError> {
    let user_model = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let email = user_model.email.clone();
    let is_vip = user_model.is_vip_shop;
    let mut active: user::ActiveModel = user_model.into();
    active.is_strategic_partner = Set(false);
    active.partner_tier = Set(None);
    active.partner_since = Set(None);
    active.commission_rate = Set(if is_vip {
        VIP_COMMISSION_RATE
    } else {
        DEFAULT_COMMISSION_RATE
    });
    active.updated_at = Set(Utc::now().to_rfc3339());

    let updated = active.update(db).await?;
    invalidate_user_cache(&email);
    Ok(updated)
}
