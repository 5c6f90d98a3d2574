//! Two independent identity planes: buyer/seller sessions (JWT issued after
//! an OAuth profile exchange, carried as a bearer token) and admin sessions
//! (separately-signed 7-day JWT carried in its own httpOnly cookie).

use chrono::{Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Instant;

use axum::{
    async_trait,
    extract::{FromRequestParts, Json},
    http::{request::Parts, StatusCode},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::models::user::{self, Entity as User};

pub const ADMIN_SESSION_COOKIE: &str = "admin_session";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user email
    pub uid: i32,
    pub role: String,
    pub exp: usize,
}

#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "Chưa đăng nhập" })),
            ))?;

        if !auth_header.starts_with("Bearer ") {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "Chưa đăng nhập" })),
            ));
        }

        let token = &auth_header[7..];
        decode_session_jwt(token).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "Phiên đăng nhập không hợp lệ hoặc đã hết hạn" })),
            )
        })
    }
}

/// Admin identity, verified per-request from the signed cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String, // admin username
    pub exp: usize,
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminClaims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(ADMIN_SESSION_COOKIE).map(|c| c.value()).ok_or((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "error": "Yêu cầu đăng nhập quản trị" })),
        ))?;

        decode_admin_token(token).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "Phiên quản trị không hợp lệ hoặc đã hết hạn" })),
            )
        })
    }
}

fn get_jwt_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "secret".to_string()
        } else {
            panic!("JWT_SECRET environment variable must be set in production");
        }
    })
}

fn get_admin_secret() -> String {
    env::var("ADMIN_TOKEN_SECRET").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "admin-secret".to_string()
        } else {
            panic!("ADMIN_TOKEN_SECRET environment variable must be set in production");
        }
    })
}

pub fn create_session_jwt(email: &str, uid: i32, role: &str) -> Result<String, String> {
    let secret = get_jwt_secret();
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: email.to_owned(),
        uid,
        role: role.to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

pub fn decode_session_jwt(token: &str) -> Result<Claims, String> {
    let secret = get_jwt_secret();
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

/// Admin tokens are signed with their own secret and live for 7 days.
pub fn create_admin_token(username: &str) -> Result<String, String> {
    let secret = get_admin_secret();
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(7))
        .expect("valid timestamp")
        .timestamp();

    let claims = AdminClaims {
        sub: username.to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

pub fn decode_admin_token(token: &str) -> Result<AdminClaims, String> {
    let secret = get_admin_secret();
    decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

const USER_CACHE_TTL_SECS: u64 = 5;
const USER_CACHE_MAX_ENTRIES: usize = 100;

static USER_CACHE: Lazy<DashMap<String, (user::Model, Instant)>> = Lazy::new(DashMap::new);

/// Look up a user by email through a short-lived cache. The cache only
/// collapses repeated lookups within a single request's helper calls;
/// it is not a correctness mechanism.
pub async fn current_user(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    if let Some(entry) = USER_CACHE.get(email) {
        if entry.1.elapsed().as_secs() < USER_CACHE_TTL_SECS {
            return Ok(Some(entry.0.clone()));
        }
    }

    let found = User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?;

    if let Some(ref model) = found {
        if USER_CACHE.len() >= USER_CACHE_MAX_ENTRIES {
            // Evict the stalest entry to keep the map bounded
            let oldest = USER_CACHE
                .iter()
                .max_by_key(|e| e.value().1.elapsed())
                .map(|e| e.key().clone());
            if let Some(key) = oldest {
                USER_CACHE.remove(&key);
            }
        }
        USER_CACHE.insert(email.to_owned(), (model.clone(), Instant::now()));
    }

    Ok(found)
}

/// Drop a cached snapshot after a mutation so the next lookup is fresh.
pub fn invalidate_user_cache(email: &str) {
    USER_CACHE.remove(email);
}
