use axum::{http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::json;
use std::env;

use crate::auth::{create_admin_token, AdminClaims, ADMIN_SESSION_COOKIE};

use crate::api::respond;

const ADMIN_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Deserialize)]
pub struct AdminLoginRequest {
    username: String,
    password: String,
}

fn admin_credentials() -> (String, String) {
    (
        env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
        env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                "admin".to_string()
            } else {
                panic!("ADMIN_PASSWORD environment variable must be set in production");
            }
        }),
    )
}

/// Admin sign-in against the configured credential pair. On success the
/// signed 7-day token lands in its own httpOnly cookie.
pub async fn login(jar: CookieJar, Json(payload): Json<AdminLoginRequest>) -> impl IntoResponse {
    let (username, password) = admin_credentials();
    if payload.username != username || payload.password != password {
        tracing::warn!("Admin login failed for username: {}", payload.username);
        return respond::error(StatusCode::UNAUTHORIZED, "Sai tài khoản hoặc mật khẩu");
    }

    let token = match create_admin_token(&username) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to sign admin token: {}", e);
            return respond::error(StatusCode::INTERNAL_SERVER_ERROR, "Đã có lỗi xảy ra");
        }
    };

    let cookie = Cookie::parse(format!(
        "{}={}; Max-Age={}; HttpOnly; Path=/",
        ADMIN_SESSION_COOKIE, token, ADMIN_TOKEN_TTL_SECS
    ))
    .expect("static cookie format");

    (
        jar.add(cookie),
        respond::ok(json!({ "message": "Đăng nhập thành công" })),
    )
        .into_response()
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let expired = Cookie::parse(format!(
        "{}=; Max-Age=0; HttpOnly; Path=/",
        ADMIN_SESSION_COOKIE
    ))
    .expect("static cookie format");

    (
        jar.add(expired),
        respond::ok(json!({ "message": "Đã đăng xuất" })),
    )
        .into_response()
}

pub async fn me(claims: AdminClaims) -> impl IntoResponse {
    respond::ok(json!({ "username": claims.sub }))
}
