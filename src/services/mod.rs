pub mod acc_service;
pub mod otp_service;
pub mod review_service;
pub mod shop_service;
pub mod view_service;

/// Error type for service operations. Validation messages are the
/// Vietnamese strings surfaced to the client.
#[derive(Debug)]
pub enum ServiceError {
    Database(String),
    NotFound,
    Validation(String),
    Forbidden(String),
    InvalidState(String),
    Conflict(String),
    RateLimited(String),
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Database(e.to_string())
    }
}
