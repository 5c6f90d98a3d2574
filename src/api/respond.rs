//! Response envelope helpers. Every route answers
//! `{"success": true, "data": ...}` or `{"success": false, "error": ...}`;
//! no error leaves a handler unconverted.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::services::ServiceError;

pub fn ok<T: Serialize>(data: T) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

pub fn created<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": data })),
    )
        .into_response()
}

pub fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}

/// Map a service failure onto the envelope. Database errors are logged
/// server-side and surfaced as a generic message.
pub fn service_error(e: ServiceError) -> Response {
    match e {
        ServiceError::NotFound => error(StatusCode::NOT_FOUND, "Không tìm thấy dữ liệu"),
        ServiceError::Validation(msg) | ServiceError::InvalidState(msg) => {
            error(StatusCode::BAD_REQUEST, &msg)
        }
        ServiceError::Forbidden(msg) => error(StatusCode::FORBIDDEN, &msg),
        ServiceError::Conflict(msg) => error(StatusCode::CONFLICT, &msg),
        ServiceError::RateLimited(msg) => error(StatusCode::TOO_MANY_REQUESTS, &msg),
        ServiceError::Database(msg) => {
            tracing::error!("Database error: {}", msg);
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Đã có lỗi xảy ra, vui lòng thử lại sau",
            )
        }
    }
}

pub fn db_error(e: sea_orm::DbErr) -> Response {
    service_error(ServiceError::from(e))
}
