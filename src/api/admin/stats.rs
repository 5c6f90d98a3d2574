use axum::{extract::State, response::IntoResponse};
use sea_orm::*;
use serde_json::json;

use crate::auth::AdminClaims;
use crate::models::acc::{self, Entity as Acc};
use crate::models::post::{self, Entity as Post};
use crate::models::review::Entity as Review;
use crate::models::user::{self, Entity as User};

use crate::api::respond;

async fn count_users(db: &DatabaseConnection, status: &str) -> Result<u64, DbErr> {
    User::find()
        .filter(user::Column::Status.eq(status))
        .count(db)
        .await
}

async fn count_accs(db: &DatabaseConnection, status: &str) -> Result<u64, DbErr> {
    Acc::find()
        .filter(acc::Column::Status.eq(status))
        .count(db)
        .await
}

async fn count_posts(db: &DatabaseConnection, status: &str) -> Result<u64, DbErr> {
    Post::find()
        .filter(post::Column::Status.eq(status))
        .count(db)
        .await
}

/// Dashboard counters for the admin home screen.
pub async fn overview(
    State(db): State<DatabaseConnection>,
    _claims: AdminClaims,
) -> impl IntoResponse {
    let result: Result<serde_json::Value, DbErr> = async {
        Ok(json!({
            "shops": {
                "total": User::find().count(&db).await?,
                "pending": count_users(&db, "PENDING").await?,
                "approved": count_users(&db, "APPROVED").await?,
                "banned": count_users(&db, "BANNED").await?,
            },
            "accs": {
                "total": Acc::find().count(&db).await?,
                "pending": count_accs(&db, "PENDING").await?,
                "approved": count_accs(&db, "APPROVED").await?,
                "sold": count_accs(&db, "SOLD").await?,
                "rejected": count_accs(&db, "REJECTED").await?,
            },
            "posts": {
                "total": Post::find().count(&db).await?,
                "draft": count_posts(&db, "DRAFT").await?,
                "published": count_posts(&db, "PUBLISHED").await?,
            },
            "reviews": {
                "total": Review::find().count(&db).await?,
            },
        }))
    }
    .await;

    match result {
        Ok(stats) => respond::ok(stats),
        Err(e) => respond::db_error(e),
    }
}
