use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use sea_orm::*;

use crate::auth::{current_user, Claims};
use crate::models::user::{self, Entity as User, ShopDto};
use crate::services::shop_service::{self, CreateShopInput, UpdateShopInput};
use crate::services::view_service;
use crate::utils::cookies::{SHOP_VIEW_WINDOW_SECS, VIEWED_SHOPS_COOKIE};

use super::respond;

/// Public storefront directory: approved shops, best-rated first.
pub async fn list_shops(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    let result = User::find()
        .filter(user::Column::Status.eq("APPROVED"))
        .filter(user::Column::ShopName.is_not_null())
        .order_by_desc(user::Column::IsVipShop)
        .order_by_desc(user::Column::Rating)
        .all(&db)
        .await;

    match result {
        Ok(shops) => {
            let dtos: Vec<ShopDto> = shops.into_iter().map(ShopDto::from).collect();
            respond::ok(dtos)
        }
        Err(e) => respond::db_error(e),
    }
}

fn viewed_shops_cookie(value: String) -> Cookie<'static> {
    Cookie::parse(format!(
        "{}={}; Max-Age={}; HttpOnly; Path=/",
        VIEWED_SHOPS_COOKIE, value, SHOP_VIEW_WINDOW_SECS
    ))
    .expect("static cookie format")
}

/// Shop detail with once-per-cookie-lifetime view counting.
pub async fn get_shop(
    State(db): State<DatabaseConnection>,
    Path(slug): Path<String>,
    claims: Option<Claims>,
    jar: CookieJar,
) -> impl IntoResponse {
    let found = match User::find()
        .filter(user::Column::ShopSlug.eq(&slug))
        .one(&db)
        .await
    {
        Ok(found) => found,
        Err(e) => return respond::db_error(e),
    };

    let model = match found {
        Some(model) if model.status == "APPROVED" => model,
        _ => return respond::error(StatusCode::NOT_FOUND, "Shop không tồn tại"),
    };

    let viewer_id = claims.as_ref().map(|c| c.uid);
    let cookie_raw = jar.get(VIEWED_SHOPS_COOKIE).map(|c| c.value().to_string());

    let outcome =
        match view_service::register_shop_view(&db, &model, viewer_id, cookie_raw.as_deref()).await
        {
            Ok(outcome) => outcome,
            Err(e) => return respond::service_error(e),
        };

    let mut dto = ShopDto::from(model);
    dto.total_views = outcome.views;

    match outcome.cookie {
        Some(value) => (jar.add(viewed_shops_cookie(value)), respond::ok(dto)).into_response(),
        None => respond::ok(dto),
    }
}

/// One-time shop creation for the session holder.
pub async fn create_shop(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(input): Json<CreateShopInput>,
) -> impl IntoResponse {
    let user_model = match current_user(&db, &claims.sub).await {
        Ok(Some(model)) => model,
        Ok(None) => return respond::error(StatusCode::UNAUTHORIZED, "Tài khoản không tồn tại"),
        Err(e) => return respond::db_error(e),
    };

    match shop_service::create_shop(&db, user_model, input).await {
        Ok(model) => respond::created(ShopDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}

pub async fn update_my_shop(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(input): Json<UpdateShopInput>,
) -> impl IntoResponse {
    let user_model = match current_user(&db, &claims.sub).await {
        Ok(Some(model)) => model,
        Ok(None) => return respond::error(StatusCode::UNAUTHORIZED, "Tài khoản không tồn tại"),
        Err(e) => return respond::db_error(e),
    };

    match shop_service::update_shop_profile(&db, user_model, input).await {
        Ok(model) => respond::ok(ShopDto::from(model)),
        Err(e) => respond::service_error(e),
    }
}
