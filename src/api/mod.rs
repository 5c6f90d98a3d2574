pub mod accs;
pub mod admin;
pub mod auth;
pub mod cron;
pub mod games;
pub mod health;
pub mod posts;
pub mod respond;
pub mod reviews;
pub mod settings;
pub mod shops;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::get_me))
        .route("/auth/otp/request", post(auth::request_otp))
        .route("/auth/otp/verify", post(auth::verify_otp))
        // Games
        .route("/games", get(games::list_games))
        .route("/games/:slug", get(games::get_game))
        // Listings
        .route("/accs", get(accs::list_accs).post(accs::create_acc))
        .route("/accs/my", get(accs::list_my_accs))
        .route(
            "/accs/:id",
            put(accs::update_acc).delete(accs::delete_acc),
        )
        .route("/accs/:id/sold", post(accs::mark_sold))
        .route("/accs/slug/:slug", get(accs::get_acc))
        // Shops
        .route("/shops", get(shops::list_shops).post(shops::create_shop))
        .route("/shops/me", put(shops::update_my_shop))
        .route("/shops/:slug", get(shops::get_shop))
        // Reviews
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        // News
        .route("/posts", get(posts::list_posts))
        .route("/posts/:slug", get(posts::get_post))
        // Site settings
        .route("/settings", get(settings::get_settings))
        // Uploads
        .route(
            "/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(upload::MAX_BODY_BYTES)),
        )
        // Cron
        .route("/cron/ingest-news", post(cron::ingest_news))
        // Admin
        .route("/admin/login", post(admin::auth::login))
        .route("/admin/logout", post(admin::auth::logout))
        .route("/admin/me", get(admin::auth::me))
        .route("/admin/stats", get(admin::stats::overview))
        .route("/admin/shops", get(admin::shops::list_shops))
        .route("/admin/shops/:id/approve", post(admin::shops::approve_shop))
        .route("/admin/shops/:id/reject", post(admin::shops::reject_shop))
        .route("/admin/shops/:id/ban", post(admin::shops::ban_shop))
        .route("/admin/shops/:id/vip", post(admin::shops::set_vip))
        .route("/admin/shops/:id/partner", post(admin::shops::set_partner))
        .route("/admin/accs", get(admin::accs::list_accs))
        .route("/admin/accs/:id/approve", post(admin::accs::approve_acc))
        .route("/admin/accs/:id/reject", post(admin::accs::reject_acc))
        .route("/admin/accs/:id/unsold", post(admin::accs::unmark_sold))
        .route("/admin/accs/:id", delete(admin::accs::delete_acc))
        .route("/admin/posts", get(admin::posts::list_posts))
        .route("/admin/posts/import", post(admin::posts::import_post))
        .route(
            "/admin/posts/:id",
            get(admin::posts::get_post).delete(admin::posts::delete_post),
        )
        .route("/admin/posts/:id/publish", post(admin::posts::publish_post))
        .route("/admin/posts/:id/reject", post(admin::posts::reject_post))
        .route(
            "/admin/games",
            get(admin::games::list_games).post(admin::games::create_game),
        )
        .route(
            "/admin/games/:id",
            put(admin::games::update_game).delete(admin::games::delete_game),
        )
        .route("/admin/reviews", get(admin::reviews::list_reviews))
        .route(
            "/admin/reviews/:id",
            delete(admin::reviews::delete_review),
        )
        .route(
            "/admin/reviews/:id/verify",
            post(admin::reviews::set_verified),
        )
        .route(
            "/admin/settings",
            get(admin::settings::get_settings).put(admin::settings::update_settings),
        )
        .with_state(db)
}
