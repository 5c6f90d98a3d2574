use axum::body::Body;
use axum::http::{Request, StatusCode};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serial_test::serial;
use tower::util::ServiceExt; // for `oneshot`
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopacc::api::api_router;
use shopacc::auth::create_session_jwt;
use shopacc::db;
use shopacc::models::{acc, game, user};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_test_seller(db: &DatabaseConnection, email: &str, status: &str) -> user::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let model = user::ActiveModel {
        email: Set(email.to_string()),
        name: Set("Seller".to_string()),
        role: Set("SELLER".to_string()),
        status: Set(status.to_string()),
        shop_name: Set(Some("Shop API".to_string())),
        shop_slug: Set(Some(format!("shop-api-{}", email.len()))),
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

async fn create_test_game(db: &DatabaseConnection, name: &str) -> game::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let model = game::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(shopacc::utils::slug::slugify(name)),
        fields_schema: Set("[]".to_string()),
        is_active: Set(true),
        sort_order: Set(0),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create game")
}

async fn create_test_listing(
    db: &DatabaseConnection,
    seller_id: i32,
    game_id: i32,
    slug: &str,
    status: &str,
) -> acc::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let model = acc::ActiveModel {
        title: Set(format!("Listing {}", slug)),
        slug: Set(slug.to_string()),
        price: Set(150_000),
        game_id: Set(game_id),
        seller_id: Set(seller_id),
        images: Set("[]".to_string()),
        attributes: Set("[]".to_string()),
        status: Set(status.to_string()),
        views: Set(0),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create listing")
}

async fn admin_login(app: &axum::Router) -> String {
    let req = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "username": "admin", "password": "admin" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("admin session cookie")
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn multipart_image_body(boundary: &str, size: usize) -> Vec<u8> {
    let mut body = Vec::with_capacity(size + 256);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\ncontent-disposition: form-data; name=\"file\"; filename=\"anh.png\"\r\ncontent-type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&vec![0x89u8; size]);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_the_service() {
    let db = setup_test_db().await;
    let app = api_router(db);

    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "shopacc");
}

#[tokio::test]
async fn public_catalog_hides_unapproved_listings() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "catalog@example.com", "APPROVED").await;
    let game = create_test_game(&db, "Free Fire").await;
    create_test_listing(&db, seller.id, game.id, "acc-public", "APPROVED").await;
    create_test_listing(&db, seller.id, game.id, "acc-hidden", "PENDING").await;
    create_test_listing(&db, seller.id, game.id, "acc-gone", "REJECTED").await;

    let app = api_router(db);
    let req = Request::builder()
        .uri("/accs")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["slug"], "acc-public");
}

#[tokio::test]
async fn listing_detail_counts_the_view_and_sets_the_cookie() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "detail@example.com", "APPROVED").await;
    let game = create_test_game(&db, "Valorant").await;
    create_test_listing(&db, seller.id, game.id, "acc-detail", "APPROVED").await;

    let app = api_router(db);
    let req = Request::builder()
        .uri("/accs/slug/acc-detail")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("view cookie")
        .to_string();
    assert!(set_cookie.starts_with("viewed_accs="));

    let json = body_json(response).await;
    assert_eq!(json["data"]["views"], 1);

    // Pending listings answer exactly like missing ones
    let req = Request::builder()
        .uri("/accs/slug/khong-ton-tai")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_creation_requires_a_session() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "writer@example.com", "APPROVED").await;
    let game = create_test_game(&db, "PUBG Mobile").await;
    let app = api_router(db);

    let payload = serde_json::json!({
        "title": "Acc PUBG Mobile đồ hiếm đầy kho",
        "price": 300_000,
        "game_id": game.id,
    });

    let req = Request::builder()
        .method("POST")
        .uri("/accs")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = create_session_jwt(&seller.email, seller.id, &seller.role).unwrap();
    let req = Request::builder()
        .method("POST")
        .uri("/accs")
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "APPROVED");
    assert_eq!(json["data"]["slug"], "acc-pubg-mobile-do-hiem-day-kho");
}

#[tokio::test]
async fn admin_routes_live_behind_the_session_cookie() {
    let db = setup_test_db().await;
    let app = api_router(db);

    // No cookie, no stats
    let req = Request::builder()
        .uri("/admin/stats")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong password
    let req = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "username": "admin", "password": "sai-mat-khau" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Default dev credentials
    let req = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "username": "admin", "password": "admin" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("admin session cookie")
        .to_string();
    assert!(set_cookie.starts_with("admin_session="));
    let cookie_pair = set_cookie.split(';').next().unwrap().to_string();

    let req = Request::builder()
        .uri("/admin/stats")
        .header("cookie", cookie_pair)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["accs"]["total"], 0);
}

#[tokio::test]
async fn deleting_a_missing_listing_is_not_found() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "janitor@example.com", "APPROVED").await;
    let game = create_test_game(&db, "Genshin Impact").await;
    let listing = create_test_listing(&db, seller.id, game.id, "acc-don-dep", "PENDING").await;

    let app = api_router(db);
    let cookie = admin_login(&app).await;

    let req = Request::builder()
        .method("DELETE")
        .uri("/admin/accs/9999")
        .header("cookie", cookie.clone())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);

    // The real row still deletes fine
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/admin/accs/{}", listing.id))
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn oversize_uploads_answer_with_the_envelope() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "uploader@example.com", "APPROVED").await;
    let app = api_router(db);
    let token = create_session_jwt(&seller.email, seller.id, &seller.role).unwrap();

    // Just past the 5MB image cap but inside the route's body limit,
    // so the handler itself gets to answer
    let boundary = "shopacc-test-boundary";
    let body = multipart_image_body(boundary, 5 * 1024 * 1024 + 1);
    let req = Request::builder()
        .method("POST")
        .uri("/upload")
        .header("Authorization", format!("Bearer {}", token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("5MB"));
}

#[tokio::test]
#[serial]
async fn mid_size_uploads_clear_the_default_body_cap() {
    let db = setup_test_db().await;
    let seller = create_test_seller(&db, "midsize@example.com", "APPROVED").await;
    let app = api_router(db);
    let token = create_session_jwt(&seller.email, seller.id, &seller.role).unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "data": { "url": "https://cdn.example.com/anh.png" } }),
        ))
        .mount(&server)
        .await;
    std::env::set_var("IMAGE_HOST_URL", format!("{}/upload", server.uri()));

    // 3MB would bounce off axum's stock 2MB body limit
    let boundary = "shopacc-test-boundary";
    let body = multipart_image_body(boundary, 3 * 1024 * 1024);
    let req = Request::builder()
        .method("POST")
        .uri("/upload")
        .header("Authorization", format!("Bearer {}", token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    std::env::remove_var("IMAGE_HOST_URL");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["url"], "https://cdn.example.com/anh.png");
}

#[tokio::test]
async fn cron_endpoint_rejects_a_missing_or_wrong_secret() {
    let db = setup_test_db().await;
    let app = api_router(db);

    let req = Request::builder()
        .method("POST")
        .uri("/cron/ingest-news")
        .header("Authorization", "Bearer sai-secret")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
