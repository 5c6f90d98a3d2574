use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use shopacc::db;
use shopacc::models::otp;
use shopacc::services::otp_service;
use shopacc::services::ServiceError;

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

#[tokio::test]
async fn issued_code_verifies_once() {
    let db = setup_test_db().await;

    let issued = otp_service::request_otp(&db, "User@Example.com ")
        .await
        .unwrap();
    assert_eq!(issued.email, "user@example.com");
    assert_eq!(issued.code.len(), 6);

    otp_service::verify_otp(&db, "user@example.com", &issued.code)
        .await
        .unwrap();

    // Verified codes are spent
    assert!(matches!(
        otp_service::verify_otp(&db, "user@example.com", &issued.code).await,
        Err(ServiceError::Validation(_))
    ));
}

#[tokio::test]
async fn fourth_attempt_is_rejected_even_with_the_right_code() {
    let db = setup_test_db().await;
    let issued = otp_service::request_otp(&db, "brute@example.com")
        .await
        .unwrap();

    for _ in 0..3 {
        let result = otp_service::verify_otp(&db, "brute@example.com", "000000").await;
        // The real code being 000000 is a one-in-a-million flake; accept either
        if result.is_ok() {
            return;
        }
    }

    assert!(matches!(
        otp_service::verify_otp(&db, "brute@example.com", &issued.code).await,
        Err(ServiceError::RateLimited(_))
    ));
}

#[tokio::test]
async fn expired_codes_are_refused() {
    let db = setup_test_db().await;
    let issued = otp_service::request_otp(&db, "late@example.com")
        .await
        .unwrap();

    let mut active: otp::ActiveModel = issued.clone().into();
    active.expires_at = Set((Utc::now() - Duration::minutes(1)).to_rfc3339());
    active.update(&db).await.unwrap();

    assert!(matches!(
        otp_service::verify_otp(&db, "late@example.com", &issued.code).await,
        Err(ServiceError::Validation(_))
    ));
}

#[tokio::test]
async fn issuance_is_rate_limited_per_email() {
    let db = setup_test_db().await;

    for _ in 0..3 {
        otp_service::request_otp(&db, "eager@example.com")
            .await
            .unwrap();
    }

    // Re-issuing must not erase the issuance record the limit counts
    let issued = otp::Entity::find()
        .filter(otp::Column::Email.eq("eager@example.com"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(issued.len(), 3);

    assert!(matches!(
        otp_service::request_otp(&db, "eager@example.com").await,
        Err(ServiceError::RateLimited(_))
    ));

    // Another email is unaffected
    otp_service::request_otp(&db, "calm@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn stale_issuances_fall_out_of_the_window() {
    let db = setup_test_db().await;

    let old = otp::ActiveModel {
        email: Set("patient@example.com".to_string()),
        code: Set("222222".to_string()),
        expires_at: Set((Utc::now() - Duration::minutes(15)).to_rfc3339()),
        attempts: Set(0),
        verified: Set(false),
        created_at: Set((Utc::now() - Duration::minutes(20)).to_rfc3339()),
        ..Default::default()
    };
    let old = old.insert(&db).await.unwrap();

    // Three fresh requests fit in the window despite the old row
    for _ in 0..3 {
        otp_service::request_otp(&db, "patient@example.com")
            .await
            .unwrap();
    }

    // The stale unverified row has been swept
    assert!(otp::Entity::find_by_id(old.id)
        .one(&db)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn success_deletes_sibling_codes() {
    let db = setup_test_db().await;

    // Backdate a leftover row; only verification sweeps siblings.
    let stale = otp::ActiveModel {
        email: Set("tidy@example.com".to_string()),
        code: Set("111111".to_string()),
        expires_at: Set((Utc::now() + Duration::minutes(5)).to_rfc3339()),
        attempts: Set(0),
        verified: Set(true),
        created_at: Set((Utc::now() - Duration::hours(1)).to_rfc3339()),
        ..Default::default()
    };
    stale.insert(&db).await.unwrap();

    let fresh = otp_service::request_otp(&db, "tidy@example.com")
        .await
        .unwrap();
    otp_service::verify_otp(&db, "tidy@example.com", &fresh.code)
        .await
        .unwrap();

    let remaining = otp::Entity::find()
        .filter(otp::Column::Email.eq("tidy@example.com"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, fresh.id);
    assert!(remaining[0].verified);
}

#[tokio::test]
async fn malformed_emails_are_rejected() {
    let db = setup_test_db().await;

    assert!(matches!(
        otp_service::request_otp(&db, "").await,
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        otp_service::request_otp(&db, "not-an-email").await,
        Err(ServiceError::Validation(_))
    ));
}
