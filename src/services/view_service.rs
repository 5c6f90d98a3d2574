//! Cookie-windowed view counting for listing and shop detail pages.
//! Owner views never count. A qualifying view increments the persisted
//! counter with a single atomic UPDATE and the returned count is
//! adjusted in-memory, never re-read.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;

use super::ServiceError;
use crate::models::acc::{self, Entity as Acc};
use crate::models::user::{self, Entity as User};
use crate::utils::cookies::{
    encode_viewed_accs, encode_viewed_shops, parse_viewed_accs, parse_viewed_shops,
    prune_viewed_accs,
};

/// Outcome of a page view: the count to render and, when the dedup
/// cookie changed, its new value.
pub struct ViewOutcome {
    pub views: i32,
    pub cookie: Option<String>,
}

/// Listing views re-arm after 2 hours; stale cookie entries are pruned
/// on every write to bound the cookie's size.
pub async fn register_acc_view(
    db: &DatabaseConnection,
    viewed: &acc::Model,
    viewer_id: Option<i32>,
    cookie_raw: Option<&str>,
) -> Result<ViewOutcome, ServiceError> {
    let now = Utc::now().timestamp();
    let entries = cookie_raw.map(parse_viewed_accs).unwrap_or_default();
    let before = entries.len();
    let mut entries = prune_viewed_accs(entries, now);
    let pruned = entries.len() != before;

    let is_owner = viewer_id == Some(viewed.seller_id);
    let already_counted = entries.iter().any(|(id, _)| *id == viewed.id);

    if is_owner || already_counted {
        return Ok(ViewOutcome {
            views: viewed.views,
            cookie: pruned.then(|| encode_viewed_accs(&entries)),
        });
    }

    Acc::update_many()
        .col_expr(acc::Column::Views, Expr::col(acc::Column::Views).add(1))
        .filter(acc::Column::Id.eq(viewed.id))
        .exec(db)
        .await?;

    entries.push((viewed.id, now));
    Ok(ViewOutcome {
        views: viewed.views + 1,
        cookie: Some(encode_viewed_accs(&entries)),
    })
}

/// Shop views are visited-once-per-cookie-lifetime: the cookie is a
/// plain id set and expires on its own after an hour.
pub async fn register_shop_view(
    db: &DatabaseConnection,
    shop: &user::Model,
    viewer_id: Option<i32>,
    cookie_raw: Option<&str>,
) -> Result<ViewOutcome, ServiceError> {
    let mut ids = cookie_raw.map(parse_viewed_shops).unwrap_or_default();

    if viewer_id == Some(shop.id) || ids.contains(&shop.id) {
        return Ok(ViewOutcome {
            views: shop.total_views,
            cookie: None,
        });
    }

    User::update_many()
        .col_expr(
            user::Column::TotalViews,
            Expr::col(user::Column::TotalViews).add(1),
        )
        .filter(user::Column::Id.eq(shop.id))
        .exec(db)
        .await?;

    ids.push(shop.id);
    Ok(ViewOutcome {
        views: shop.total_views + 1,
        cookie: Some(encode_viewed_shops(&ids)),
    })
}
