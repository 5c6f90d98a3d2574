use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use sea_orm::*;
use serde::Deserialize;

use crate::auth::{current_user, Claims};
use crate::models::acc::{self, Acc as AccDto, Entity as Acc};
use crate::services::acc_service::{self, CreateAccInput, UpdateAccInput};
use crate::services::view_service;
use crate::utils::cookies::{ACC_VIEW_WINDOW_SECS, VIEWED_ACCS_COOKIE};

use super::respond;

#[derive(Debug, Deserialize)]
pub struct AccsQuery {
    pub game_id: Option<i32>,
    pub seller_id: Option<i32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub q: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Public catalog: APPROVED listings only, newest first. The search
/// parameter is a plain substring match on the title.
pub async fn list_accs(
    State(db): State<DatabaseConnection>,
    Query(params): Query<AccsQuery>,
) -> impl IntoResponse {
    let mut query = Acc::find().filter(acc::Column::Status.eq("APPROVED"));

    if let Some(game_id) = params.game_id {
        query = query.filter(acc::Column::GameId.eq(game_id));
    }
    if let Some(seller_id) = params.seller_id {
        query = query.filter(acc::Column::SellerId.eq(seller_id));
    }
    if let Some(min_price) = params.min_price {
        query = query.filter(acc::Column::Price.gte(min_price));
    }
    if let Some(max_price) = params.max_price {
        query = query.filter(acc::Column::Price.lte(max_price));
    }
    if let Some(q) = params.q.filter(|q| !q.trim().is_empty()) {
        query = query.filter(acc::Column::Title.contains(q.trim()));
    }

    let query = query
        .order_by_desc(acc::Column::CreatedAt)
        .limit(params.limit.unwrap_or(40).min(100))
        .offset(params.offset.unwrap_or(0));

    match query.all(&db).await {
        Ok(accs) => {
            let dtos: Vec<AccDto> = accs.into_iter().map(AccDto::from).collect();
            respond::ok(dtos)
        }
        Err(e) => respond::db_error(e),
    }
}

fn viewed_accs_cookie(value: String) -> Cookie<'static> {
    Cookie::parse(format!(
        "{}={}; Max-Age={}; HttpOnly; Path=/",
        VIEWED_ACCS_COOKIE, value, ACC_VIEW_WINDOW_SECS
    ))
    .expect("static cookie format")
}

/// Listing detail with view dedup. Unapproved listings answer with the
/// same 404 as a missing one so their existence does not leak.
pub async fn get_acc(
    State(db): State<DatabaseConnection>,
    Path(slug): Path<String>,
    claims: Option<Claims>,
    jar: CookieJar,
) -> impl IntoResponse {
    let found = match Acc::find()
        .filter(acc::Column::Slug.eq(&slug))
        .one(&db)
        .await
    {
        Ok(found) => found,
        Err(e) => return respond::db_error(e),
    };

    let model = match found {
        Some(model) if model.status == "APPROVED" || model.status == "SOLD" => model,
        _ => {
            return respond::error(
                StatusCode::NOT_FOUND,
                "Tài khoản không tồn tại hoặc đã bị gỡ",
            )
        }
    };

    let viewer_id = claims.as_ref().map(|c| c.uid);
    let cookie_raw = jar.get(VIEWED_ACCS_COOKIE).map(|c| c.value().to_string());

    let outcome =
        match view_service::register_acc_view(&db, &model, viewer_id, cookie_raw.as_deref()).await
        {
            Ok(outcome) => outcome,
            Err(e) => return respond::service_error(e),
        };

    let mut dto = AccDto::from(model);
    dto.views = outcome.views;

    match outcome.cookie {
        Some(value) => (jar.add(viewed_accs_cookie(value)), respond::ok(dto)).into_response(),
        None => respond::ok(dto),
    }
}

pub async fn create_acc(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(input): Json<CreateAccInput>,
) -> impl IntoResponse {
    let seller = match current_user(&db, &claims.sub).await {
        Ok(Some(seller)) => seller,
        Ok(None) => return respond::error(StatusCode::UNAUTHORIZED, "Tài khoản không tồn tại"),
        Err(e) => return respond::db_error(e),
    };

    match acc_service::create_acc(&db, &seller, input).await {
        Ok(model) => respond::created(AccDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}

pub async fn update_acc(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    claims: Claims,
    Json(input): Json<UpdateAccInput>,
) -> impl IntoResponse {
    match acc_service::update_acc(&db, claims.uid, id, input).await {
        Ok(model) => respond::ok(AccDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}

pub async fn delete_acc(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    claims: Claims,
) -> impl IntoResponse {
    match acc_service::delete_acc(&db, claims.uid, id).await {
        Ok(()) => respond::ok(serde_json::json!({ "message": "Đã xóa tài khoản" })),
        Err(e) => respond::service_error(e),
    }
}

pub async fn mark_sold(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    claims: Claims,
) -> impl IntoResponse {
    match acc_service::mark_sold(&db, claims.uid, id).await {
        Ok(model) => respond::ok(AccDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}

/// Listings owned by the session holder, every status included.
pub async fn list_my_accs(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> impl IntoResponse {
    let result = Acc::find()
        .filter(acc::Column::SellerId.eq(claims.uid))
        .order_by_desc(acc::Column::CreatedAt)
        .all(&db)
        .await;

    match result {
        Ok(accs) => {
            let dtos: Vec<AccDto> = accs.into_iter().map(AccDto::from).collect();
            respond::ok(dtos)
        }
        Err(e) => respond::db_error(e),
    }
}
