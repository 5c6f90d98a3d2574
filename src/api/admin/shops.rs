use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use sea_orm::*;
use serde::Deserialize;

use crate::auth::AdminClaims;
use crate::models::user::{self, Entity as User, ShopDto};
use crate::services::shop_service;

use crate::api::respond;

#[derive(Debug, Deserialize)]
pub struct AdminShopsQuery {
    pub status: Option<String>,
}

pub async fn list_shops(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Query(params): Query<AdminShopsQuery>,
) -> impl IntoResponse {
    let mut query = User::find();

    if let Some(status) = params.status {
        query = query.filter(user::Column::Status.eq(status));
    }

    match query.order_by_desc(user::Column::CreatedAt).all(&db).await {
        Ok(users) => {
            let dtos: Vec<ShopDto> = users.into_iter().map(ShopDto::from).collect();
            respond::ok(dtos)
        }
        Err(e) => respond::db_error(e),
    }
}

pub async fn approve_shop(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match shop_service::approve_shop(&db, id).await {
        Ok(model) => respond::ok(ShopDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}

pub async fn reject_shop(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match shop_service::reject_shop(&db, id).await {
        Ok(model) => respond::ok(ShopDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}

pub async fn ban_shop(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match shop_service::ban_shop(&db, id).await {
        Ok(model) => respond::ok(ShopDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}

#[derive(Deserialize)]
pub struct VipRequest {
    enabled: bool,
    days: Option<i64>,
}

pub async fn set_vip(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
    Json(payload): Json<VipRequest>,
) -> impl IntoResponse {
    let result = if payload.enabled {
        shop_service::set_vip(&db, id, payload.days.unwrap_or(30)).await
    } else {
        shop_service::unset_vip(&db, id).await
    };

    match result {
        Ok(model) => respond::ok(ShopDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}

#[derive(Deserialize)]
pub struct PartnerRequest {
    enabled: bool,
    tier: Option<String>,
    commission_rate: Option<f64>,
}

pub async fn set_partner(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
    Json(payload): Json<PartnerRequest>,
) -> impl IntoResponse {
    let result = if payload.enabled {
        let tier = payload.tier.unwrap_or_else(|| "STANDARD".to_string());
        let rate = match payload.commission_rate {
            Some(rate) => rate,
            None => {
                return respond::error(
                    axum::http::StatusCode::BAD_REQUEST,
                    "Thiếu phí hoa hồng đối tác",
                )
            }
        };
        shop_service::set_partner(&db, id, tier, rate).await
    } else {
        shop_service::unset_partner(&db, id).await
    };

    match result {
        Ok(model) => respond::ok(ShopDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}
