use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use sea_orm::*;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{create_session_jwt, current_user, invalidate_user_cache, Claims};
use crate::models::user::{self, Entity as User, ShopDto};
use crate::modules::integrations::{mailer, oauth};
use crate::services::otp_service;

use super::respond;

/// A sign-in is treated as brand-new when creation and last-active
/// timestamps land within this many seconds of each other.
const NEW_USER_WINDOW_SECS: i64 = 5;

#[derive(Deserialize)]
pub struct LoginRequest {
    access_token: String,
}

fn parse_ts(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Exchange an OAuth access token for a session. Creates the user
/// record (PENDING, no shop) on first sign-in.
pub async fn login(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let profile = match oauth::fetch_profile(&payload.access_token).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("OAuth exchange failed: {}", e);
            return respond::error(StatusCode::UNAUTHORIZED, "Đăng nhập thất bại");
        }
    };

    let existing = match User::find()
        .filter(user::Column::Email.eq(&profile.email))
        .one(&db)
        .await
    {
        Ok(found) => found,
        Err(e) => return respond::db_error(e),
    };

    let now = Utc::now();
    let user_model = match existing {
        Some(model) => model,
        None => {
            let new_user = user::ActiveModel {
                email: Set(profile.email.clone()),
                name: Set(profile.name.clone().unwrap_or_else(|| profile.email.clone())),
                avatar: Set(profile.picture.clone()),
                role: Set("SELLER".to_string()),
                status: Set("PENDING".to_string()),
                commission_rate: Set(5.0),
                rating: Set(5.0),
                created_at: Set(now.to_rfc3339()),
                updated_at: Set(now.to_rfc3339()),
                last_active_at: Set(now.to_rfc3339()),
                ..Default::default()
            };
            match new_user.insert(&db).await {
                Ok(model) => model,
                Err(e) => return respond::db_error(e),
            }
        }
    };

    // Heuristic "fresh signup" flag: creation and last activity nearly
    // coincide only on the very first sign-in
    let is_new_user = match (
        parse_ts(&user_model.created_at),
        parse_ts(&user_model.last_active_at),
    ) {
        (Some(created), Some(active)) => {
            (active - created).num_seconds().abs() <= NEW_USER_WINDOW_SECS
        }
        _ => false,
    };

    let email = user_model.email.clone();
    let uid = user_model.id;
    let role = user_model.role.clone();

    let mut active: user::ActiveModel = user_model.clone().into();
    active.last_active_at = Set(now.to_rfc3339());
    if let Some(name) = profile.name {
        active.name = Set(name);
    }
    if let Some(picture) = profile.picture {
        active.avatar = Set(Some(picture));
    }
    let refreshed = match active.update(&db).await {
        Ok(model) => model,
        Err(e) => return respond::db_error(e),
    };
    invalidate_user_cache(&email);

    let token = match create_session_jwt(&email, uid, &role) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to sign session token: {}", e);
            return respond::error(StatusCode::INTERNAL_SERVER_ERROR, "Đã có lỗi xảy ra");
        }
    };

    respond::ok(json!({
        "token": token,
        "user": ShopDto::from(refreshed),
        "is_new_user": is_new_user,
    }))
}

/// Fresh role/status/shop snapshot for the session holder.
pub async fn get_me(State(db): State<DatabaseConnection>, claims: Claims) -> impl IntoResponse {
    match current_user(&db, &claims.sub).await {
        Ok(Some(model)) => respond::ok(ShopDto::from(model)),
        Ok(None) => respond::error(StatusCode::UNAUTHORIZED, "Tài khoản không tồn tại"),
        Err(e) => respond::db_error(e),
    }
}

#[derive(Deserialize)]
pub struct OtpRequest {
    email: String,
}

pub async fn request_otp(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<OtpRequest>,
) -> impl IntoResponse {
    let otp = match otp_service::request_otp(&db, &payload.email).await {
        Ok(otp) => otp,
        Err(e) => return respond::service_error(e),
    };

    if let Err(e) = mailer::send_otp_email(&otp.email, &otp.code).await {
        tracing::error!("OTP mail to {} failed: {}", otp.email, e);
        return respond::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Không gửi được email xác thực, vui lòng thử lại",
        );
    }

    respond::ok(json!({ "message": "Đã gửi mã xác thực đến email của bạn" }))
}

#[derive(Deserialize)]
pub struct OtpVerifyRequest {
    email: String,
    code: String,
}

pub async fn verify_otp(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<OtpVerifyRequest>,
) -> impl IntoResponse {
    match otp_service::verify_otp(&db, &payload.email, &payload.code).await {
        Ok(()) => respond::ok(json!({ "message": "Xác thực email thành công" })),
        Err(e) => respond::service_error(e),
    }
}
