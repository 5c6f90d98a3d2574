use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use shopacc::db;
use shopacc::models::{acc, game, user};
use shopacc::services::acc_service::{self, CreateAccInput, UpdateAccInput};
use shopacc::services::ServiceError;

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_test_seller(db: &DatabaseConnection, email: &str, status: &str) -> user::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let model = user::ActiveModel {
        email: Set(email.to_string()),
        name: Set("Test Seller".to_string()),
        role: Set("SELLER".to_string()),
        status: Set(status.to_string()),
        shop_name: Set(Some("Test Shop".to_string())),
        shop_slug: Set(Some(format!("test-shop-{}", email.len()))),
        is_verified: Set(status == "APPROVED"),
        is_vip_shop: Set(false),
        is_strategic_partner: Set(false),
        commission_rate: Set(5.0),
        rating: Set(5.0),
        total_reviews: Set(0),
        total_sales: Set(0),
        total_views: Set(0),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        last_active_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create seller")
}

async fn create_test_game(db: &DatabaseConnection, name: &str, is_active: bool) -> game::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let model = game::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(shopacc::utils::slug::slugify(name)),
        fields_schema: Set("[]".to_string()),
        is_active: Set(is_active),
        sort_order: Set(0),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create game")
}

fn valid_input(game_id: i32) -> CreateAccInput {
    CreateAccInput {
        title: "Acc Liên Quân 50 tướng xịn".to_string(),
        description: Some("Acc trắng thông tin".to_string()),
        price: 450_000,
        original_price: None,
        game_id,
        images: vec!["https://img.example.com/1.jpg".to_string()],
        attributes: vec![],
    }
}

#[tokio::test]
async fn approved_shop_listing_is_auto_approved() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "a@example.com", "APPROVED").await;
    let game = create_test_game(&db, "Liên Quân Mobile", true).await;

    let created = acc_service::create_acc(&db, &seller, valid_input(game.id))
        .await
        .expect("create should succeed");

    assert_eq!(created.status, "APPROVED");
    assert!(created.approved_at.is_some());
    assert_eq!(created.slug, "acc-lien-quan-50-tuong-xin");
}

#[tokio::test]
async fn pending_shop_cannot_list() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "p@example.com", "PENDING").await;
    let game = create_test_game(&db, "Free Fire", true).await;

    let result = acc_service::create_acc(&db, &seller, valid_input(game.id)).await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));
}

#[tokio::test]
async fn inactive_game_rejects_new_listings() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "g@example.com", "APPROVED").await;
    let game = create_test_game(&db, "Game Cũ Đóng Cửa", false).await;

    let result = acc_service::create_acc(&db, &seller, valid_input(game.id)).await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn price_and_title_validation() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "v@example.com", "APPROVED").await;
    let game = create_test_game(&db, "PUBG Mobile", true).await;

    let mut cheap = valid_input(game.id);
    cheap.price = 9_999;
    assert!(matches!(
        acc_service::create_acc(&db, &seller, cheap).await,
        Err(ServiceError::Validation(_))
    ));

    let mut short = valid_input(game.id);
    short.title = "Acc ngắn".to_string();
    assert!(matches!(
        acc_service::create_acc(&db, &seller, short).await,
        Err(ServiceError::Validation(_))
    ));

    let mut bloated = valid_input(game.id);
    bloated.images = (0..16).map(|i| format!("https://img/{}.jpg", i)).collect();
    assert!(matches!(
        acc_service::create_acc(&db, &seller, bloated).await,
        Err(ServiceError::Validation(_))
    ));
}

#[tokio::test]
async fn duplicate_titles_get_suffixed_slugs() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "s@example.com", "APPROVED").await;
    let game = create_test_game(&db, "Valorant", true).await;

    let first = acc_service::create_acc(&db, &seller, valid_input(game.id))
        .await
        .unwrap();
    let second = acc_service::create_acc(&db, &seller, valid_input(game.id))
        .await
        .unwrap();
    let third = acc_service::create_acc(&db, &seller, valid_input(game.id))
        .await
        .unwrap();

    assert_eq!(first.slug, "acc-lien-quan-50-tuong-xin");
    assert_eq!(second.slug, "acc-lien-quan-50-tuong-xin-1");
    assert_eq!(third.slug, "acc-lien-quan-50-tuong-xin-2");
}

#[tokio::test]
async fn sold_listing_is_immutable() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "sold@example.com", "APPROVED").await;
    let game = create_test_game(&db, "Genshin Impact", true).await;

    let listing = acc_service::create_acc(&db, &seller, valid_input(game.id))
        .await
        .unwrap();
    acc_service::mark_sold(&db, seller.id, listing.id)
        .await
        .unwrap();

    let edit = acc_service::update_acc(
        &db,
        seller.id,
        listing.id,
        UpdateAccInput {
            price: Some(999_000),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(edit, Err(ServiceError::InvalidState(_))));

    let delete = acc_service::delete_acc(&db, seller.id, listing.id).await;
    assert!(matches!(delete, Err(ServiceError::InvalidState(_))));
}

#[tokio::test]
async fn mark_and_unmark_sold_round_trips_sales_counter() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "counter@example.com", "APPROVED").await;
    let game = create_test_game(&db, "FC Online", true).await;

    let listing = acc_service::create_acc(&db, &seller, valid_input(game.id))
        .await
        .unwrap();

    let sold = acc_service::mark_sold(&db, seller.id, listing.id)
        .await
        .unwrap();
    assert_eq!(sold.status, "SOLD");
    assert!(sold.sold_at.is_some());

    let after_sale = user::Entity::find_by_id(seller.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after_sale.total_sales, 1);

    // Double-selling is rejected
    assert!(matches!(
        acc_service::mark_sold(&db, seller.id, listing.id).await,
        Err(ServiceError::InvalidState(_))
    ));

    let restored = acc_service::unmark_sold(&db, listing.id).await.unwrap();
    assert_eq!(restored.status, "APPROVED");
    assert!(restored.sold_at.is_none());

    let after_revert = user::Entity::find_by_id(seller.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after_revert.total_sales, 0);
}

#[tokio::test]
async fn rejected_listing_reenters_moderation_on_edit() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "rej@example.com", "APPROVED").await;
    let game = create_test_game(&db, "Roblox", true).await;

    let listing = acc_service::create_acc(&db, &seller, valid_input(game.id))
        .await
        .unwrap();

    let rejected = acc_service::admin_reject(&db, listing.id, "Ảnh không rõ ràng")
        .await
        .unwrap();
    assert_eq!(rejected.status, "REJECTED");
    assert_eq!(rejected.admin_note.as_deref(), Some("Ảnh không rõ ràng"));

    // A too-short reason never lands
    assert!(matches!(
        acc_service::admin_reject(&db, listing.id, "xấu").await,
        Err(ServiceError::Validation(_))
    ));

    let edited = acc_service::update_acc(
        &db,
        seller.id,
        listing.id,
        UpdateAccInput {
            images: Some(vec!["https://img/clear.jpg".to_string()]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(edited.status, "PENDING");
    assert!(edited.admin_note.is_none());
}

#[tokio::test]
async fn only_the_owner_can_touch_a_listing() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "owner@example.com", "APPROVED").await;
    let intruder = create_test_seller(&db, "other@ex.com", "APPROVED").await;
    let game = create_test_game(&db, "LMHT", true).await;

    let listing = acc_service::create_acc(&db, &seller, valid_input(game.id))
        .await
        .unwrap();

    assert!(matches!(
        acc_service::update_acc(&db, intruder.id, listing.id, UpdateAccInput::default()).await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        acc_service::delete_acc(&db, intruder.id, listing.id).await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        acc_service::mark_sold(&db, intruder.id, listing.id).await,
        Err(ServiceError::Forbidden(_))
    ));

    acc_service::delete_acc(&db, seller.id, listing.id)
        .await
        .unwrap();
    let remaining = acc::Entity::find()
        .filter(acc::Column::SellerId.eq(seller.id))
        .all(&db)
        .await
        .unwrap();
    assert!(remaining.is_empty());
}
