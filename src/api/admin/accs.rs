use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::*;
use serde::Deserialize;

use crate::auth::AdminClaims;
use crate::models::acc::{self, Acc as AccDto, Entity as Acc};
use crate::services::acc_service;

use crate::api::respond;

#[derive(Debug, Deserialize)]
pub struct AdminAccsQuery {
    pub status: Option<String>,
    pub seller_id: Option<i32>,
}

/// Moderation list: every status, newest first.
pub async fn list_accs(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Query(params): Query<AdminAccsQuery>,
) -> impl IntoResponse {
    let mut query = Acc::find();

    if let Some(status) = params.status {
        query = query.filter(acc::Column::Status.eq(status));
    }
    if let Some(seller_id) = params.seller_id {
        query = query.filter(acc::Column::SellerId.eq(seller_id));
    }

    match query.order_by_desc(acc::Column::CreatedAt).all(&db).await {
        Ok(accs) => {
            let dtos: Vec<AccDto> = accs.into_iter().map(AccDto::from).collect();
            respond::ok(dtos)
        }
        Err(e) => respond::db_error(e),
    }
}

pub async fn approve_acc(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match acc_service::admin_approve(&db, id).await {
        Ok(model) => respond::ok(AccDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}

#[derive(Deserialize)]
pub struct RejectRequest {
    reason: String,
}

pub async fn reject_acc(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
    Json(payload): Json<RejectRequest>,
) -> impl IntoResponse {
    match acc_service::admin_reject(&db, id, &payload.reason).await {
        Ok(model) => respond::ok(AccDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}

pub async fn unmark_sold(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match acc_service::unmark_sold(&db, id).await {
        Ok(model) => respond::ok(AccDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}

pub async fn delete_acc(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match Acc::delete_by_id(id).exec(&db).await {
        Ok(res) if res.rows_affected > 0 => {
            respond::ok(serde_json::json!({ "message": "Đã xóa tài khoản" }))
        }
        Ok(_) => respond::error(StatusCode::NOT_FOUND, "Tài khoản không tồn tại"),
        Err(e) => respond::db_error(e),
    }
}
