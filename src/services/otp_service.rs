//! Email OTP issuance and verification. Issuance is capped at 3 codes
//! per email per 10-minute window (count-over-window query, an accepted
//! approximation rather than a true rate limiter). A code survives at
//! most 3 verification attempts and expires after 5 minutes.

use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::*;

use super::ServiceError;
use crate::models::otp::{self, Entity as Otp};

pub const OTP_TTL_MINUTES: i64 = 5;
pub const MAX_ATTEMPTS: i32 = 3;
pub const RATE_LIMIT_WINDOW_MINUTES: i64 = 10;
pub const RATE_LIMIT_MAX_REQUESTS: u64 = 3;

fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..1_000_000))
}

/// Issue a fresh code for the email. Rows inside the rate-limit window
/// stay put as the issuance record (the newest code is the one that
/// verifies); unverified rows older than the window are swept.
pub async fn request_otp(
    db: &DatabaseConnection,
    email: &str,
) -> Result<otp::Model, ServiceError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ServiceError::Validation(
            "Địa chỉ email không hợp lệ".to_string(),
        ));
    }

    let now = Utc::now();
    let window_start = (now - Duration::minutes(RATE_LIMIT_WINDOW_MINUTES)).to_rfc3339();

    let recent = Otp::find()
        .filter(otp::Column::Email.eq(&email))
        .filter(otp::Column::CreatedAt.gt(&window_start))
        .count(db)
        .await?;
    if recent >= RATE_LIMIT_MAX_REQUESTS {
        return Err(ServiceError::RateLimited(
            "Bạn đã yêu cầu mã quá nhiều lần, vui lòng thử lại sau".to_string(),
        ));
    }

    // Sweep stale unverified codes only. In-window rows must survive,
    // they are what the count above is counting.
    Otp::delete_many()
        .filter(otp::Column::Email.eq(&email))
        .filter(otp::Column::Verified.eq(false))
        .filter(otp::Column::CreatedAt.lte(&window_start))
        .exec(db)
        .await?;

    let new_otp = otp::ActiveModel {
        email: Set(email),
        code: Set(generate_code()),
        expires_at: Set((now + Duration::minutes(OTP_TTL_MINUTES)).to_rfc3339()),
        attempts: Set(0),
        verified: Set(false),
        created_at: Set(now.to_rfc3339()),
        ..Default::default()
    };

    Ok(new_otp.insert(db).await?)
}

/// Verify a code. The 4th attempt on a code is rejected regardless of
/// correctness; a successful verification deletes every sibling row
/// for the email.
pub async fn verify_otp(
    db: &DatabaseConnection,
    email: &str,
    code: &str,
) -> Result<(), ServiceError> {
    let email = email.trim().to_lowercase();

    let row = Otp::find()
        .filter(otp::Column::Email.eq(&email))
        .filter(otp::Column::Verified.eq(false))
        .order_by_desc(otp::Column::Id)
        .one(db)
        .await?
        .ok_or_else(|| {
            ServiceError::Validation("Không tìm thấy mã xác thực cho email này".to_string())
        })?;

    if row.attempts >= MAX_ATTEMPTS {
        return Err(ServiceError::RateLimited(
            "Bạn đã nhập sai quá nhiều lần, vui lòng yêu cầu mã mới".to_string(),
        ));
    }

    if row.expires_at < Utc::now().to_rfc3339() {
        return Err(ServiceError::Validation(
            "Mã xác thực đã hết hạn".to_string(),
        ));
    }

    if row.code != code.trim() {
        let attempts = row.attempts + 1;
        let mut active: otp::ActiveModel = row.into();
        active.attempts = Set(attempts);
        active.update(db).await?;
        return Err(ServiceError::Validation(
            "Mã xác thực không đúng".to_string(),
        ));
    }

    let row_id = row.id;
    let mut active: otp::ActiveModel = row.into();
    active.verified = Set(true);
    active.update(db).await?;

    // Clean up sibling codes for the email
    Otp::delete_many()
        .filter(otp::Column::Email.eq(&email))
        .filter(otp::Column::Id.ne(row_id))
        .exec(db)
        .await?;

    Ok(())
}
