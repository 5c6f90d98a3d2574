use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use shopacc::db;
use shopacc::models::user;
use shopacc::services::shop_service::{
    self, CreateShopInput, DEFAULT_COMMISSION_RATE, VIP_COMMISSION_RATE,
};
use shopacc::services::ServiceError;

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_test_user(db: &DatabaseConnection, email: &str) -> user::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let model = user::ActiveModel {
        email: Set(email.to_string()),
        name: Set("Người dùng".to_string()),
        role: Set("SELLER".to_string()),
        status: Set("PENDING".to_string()),
        is_verified: Set(false),
        is_vip_shop: Set(false),
        is_strategic_partner: Set(false),
        commission_rate: Set(DEFAULT_COMMISSION_RATE),
        rating: Set(5.0),
        total_reviews: Set(0),
        total_sales: Set(0),
        total_views: Set(0),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        last_active_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create user")
}

fn shop_input(name: &str) -> CreateShopInput {
    CreateShopInput {
        shop_name: name.to_string(),
        shop_description: Some("Shop uy tín".to_string()),
        shop_avatar: None,
        shop_cover: None,
        featured_games: vec!["lien-quan-mobile".to_string()],
    }
}

#[tokio::test]
async fn create_shop_starts_pending_with_unique_slug() {
    let db = setup_test_db().await;
    let first = create_test_user(&db, "one@example.com").await;
    let second = create_test_user(&db, "two@example.com").await;

    let a = shop_service::create_shop(&db, first, shop_input("Shop Gà Vàng"))
        .await
        .unwrap();
    assert_eq!(a.status, "PENDING");
    assert_eq!(a.shop_slug.as_deref(), Some("shop-ga-vang"));

    let b = shop_service::create_shop(&db, second, shop_input("Shop Gà Vàng"))
        .await
        .unwrap();
    assert_eq!(b.shop_slug.as_deref(), Some("shop-ga-vang-1"));

    // One shop per identity
    let again = shop_service::create_shop(&db, a, shop_input("Shop Khác")).await;
    assert!(matches!(again, Err(ServiceError::InvalidState(_))));
}

#[tokio::test]
async fn short_shop_names_are_rejected() {
    let db = setup_test_db().await;
    let user = create_test_user(&db, "short@example.com").await;

    let result = shop_service::create_shop(&db, user, shop_input("ab")).await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn approve_sets_verified_badge_and_timestamp() {
    let db = setup_test_db().await;
    let user = create_test_user(&db, "appr@example.com").await;
    let shop = shop_service::create_shop(&db, user, shop_input("Shop Duyệt Nhanh"))
        .await
        .unwrap();

    let approved = shop_service::approve_shop(&db, shop.id).await.unwrap();
    assert_eq!(approved.status, "APPROVED");
    assert!(approved.is_verified);
    assert!(approved.approved_at.is_some());

    let rejected = shop_service::reject_shop(&db, shop.id).await.unwrap();
    assert_eq!(rejected.status, "REJECTED");
    assert!(!rejected.is_verified);
}

#[tokio::test]
async fn ban_wipes_shop_identity_and_is_terminal() {
    let db = setup_test_db().await;
    let user = create_test_user(&db, "ban@example.com").await;
    let shop = shop_service::create_shop(&db, user, shop_input("Shop Sắp Bị Khóa"))
        .await
        .unwrap();
    shop_service::approve_shop(&db, shop.id).await.unwrap();
    shop_service::set_vip(&db, shop.id, 90).await.unwrap();

    let banned = shop_service::ban_shop(&db, shop.id).await.unwrap();
    assert_eq!(banned.status, "BANNED");
    assert!(banned.shop_name.is_none());
    assert!(banned.shop_slug.is_none());
    assert!(banned.featured_games.is_none());
    assert!(!banned.is_verified);
    assert!(!banned.is_vip_shop);
    assert!(banned.vip_shop_end_time.is_none());
    assert_eq!(banned.commission_rate, DEFAULT_COMMISSION_RATE);

    // The email stays registered; no second life
    assert!(matches!(
        shop_service::ban_shop(&db, shop.id).await,
        Err(ServiceError::InvalidState(_))
    ));
    assert!(matches!(
        shop_service::approve_shop(&db, shop.id).await,
        Err(ServiceError::InvalidState(_))
    ));
    assert!(matches!(
        shop_service::create_shop(&db, banned, shop_input("Shop Hồi Sinh")).await,
        Err(ServiceError::Forbidden(_))
    ));
}

#[tokio::test]
async fn vip_days_stack_onto_unexpired_window() {
    let db = setup_test_db().await;
    let user = create_test_user(&db, "vip@example.com").await;
    let shop = shop_service::create_shop(&db, user, shop_input("Shop VIP"))
        .await
        .unwrap();

    assert!(matches!(
        shop_service::set_vip(&db, shop.id, 45).await,
        Err(ServiceError::Validation(_))
    ));

    let first = shop_service::set_vip(&db, shop.id, 30).await.unwrap();
    assert!(first.is_vip_shop);
    assert_eq!(first.commission_rate, VIP_COMMISSION_RATE);
    let first_end = DateTime::parse_from_rfc3339(first.vip_shop_end_time.as_deref().unwrap())
        .unwrap()
        .with_timezone(&Utc);
    assert!(first_end > Utc::now() + Duration::days(29));

    let stacked = shop_service::set_vip(&db, shop.id, 90).await.unwrap();
    let stacked_end = DateTime::parse_from_rfc3339(stacked.vip_shop_end_time.as_deref().unwrap())
        .unwrap()
        .with_timezone(&Utc);
    assert!(stacked_end > Utc::now() + Duration::days(119));

    let cleared = shop_service::unset_vip(&db, shop.id).await.unwrap();
    assert!(!cleared.is_vip_shop);
    assert!(cleared.vip_shop_end_time.is_none());
    assert_eq!(cleared.commission_rate, DEFAULT_COMMISSION_RATE);
}

#[tokio::test]
async fn partner_rate_takes_precedence_over_vip() {
    let db = setup_test_db().await;
    let user = create_test_user(&db, "partner@example.com").await;
    let shop = shop_service::create_shop(&db, user, shop_input("Shop Đối Tác"))
        .await
        .unwrap();

    assert!(matches!(
        shop_service::set_partner(&db, shop.id, "GOLD".to_string(), 6.0).await,
        Err(ServiceError::Validation(_))
    ));

    let partner = shop_service::set_partner(&db, shop.id, "GOLD".to_string(), 1.5)
        .await
        .unwrap();
    assert!(partner.is_strategic_partner);
    assert_eq!(partner.partner_tier.as_deref(), Some("GOLD"));
    assert_eq!(partner.commission_rate, 1.5);

    // VIP on a partner keeps the negotiated rate
    let vip = shop_service::set_vip(&db, shop.id, 30).await.unwrap();
    assert_eq!(vip.commission_rate, 1.5);

    // Dropping the partnership falls back to the VIP rate while VIP lasts
    let dropped = shop_service::unset_partner(&db, shop.id).await.unwrap();
    assert!(!dropped.is_strategic_partner);
    assert!(dropped.partner_tier.is_none());
    assert_eq!(dropped.commission_rate, VIP_COMMISSION_RATE);
}
