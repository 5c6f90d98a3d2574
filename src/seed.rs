use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::models::{acc, game, user};
use crate::services::shop_service::DEFAULT_COMMISSION_RATE;
use crate::utils::slug::slugify;

/// Demo data for local development, gated behind SEED_DEMO.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = Utc::now().to_rfc3339();

    // 1. Game catalog
    let games = vec![
        ("Liên Quân Mobile", "⚔️", 1),
        ("Free Fire", "🔥", 2),
        ("PUBG Mobile", "🪂", 3),
        ("Genshin Impact", "🌟", 4),
        ("Valorant", "🎯", 5),
    ];

    for (name, icon, sort_order) in games {
        let model = game::ActiveModel {
            name: Set(name.to_owned()),
            slug: Set(slugify(name)),
            icon: Set(Some(icon.to_owned())),
            fields_schema: Set("[]".to_owned()),
            is_active: Set(true),
            sort_order: Set(sort_order),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        game::Entity::insert(model)
            .on_conflict(
                OnConflict::column(game::Column::Slug)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    // 2. Approved demo shop
    let shop = user::ActiveModel {
        email: Set("demo.shop@example.com".to_owned()),
        name: Set("Demo Seller".to_owned()),
        avatar: Set(None),
        role: Set("SELLER".to_owned()),
        status: Set("APPROVED".to_owned()),
        shop_name: Set(Some("Shop Acc Demo".to_owned())),
        shop_slug: Set(Some("shop-acc-demo".to_owned())),
        shop_description: Set(Some("Shop bán acc uy tín, giao dịch nhanh.".to_owned())),
        shop_avatar: Set(None),
        shop_cover: Set(None),
        featured_games: Set(Some("[\"lien-quan-mobile\",\"free-fire\"]".to_owned())),
        is_verified: Set(true),
        is_vip_shop: Set(false),
        vip_shop_end_time: Set(None),
        is_strategic_partner: Set(false),
        partner_tier: Set(None),
        partner_since: Set(None),
        commission_rate: Set(DEFAULT_COMMISSION_RATE),
        rating: Set(5.0),
        total_reviews: Set(0),
        total_sales: Set(0),
        total_views: Set(0),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        last_active_at: Set(now.clone()),
        approved_at: Set(Some(now.clone())),
        ..Default::default()
    };
    user::Entity::insert(shop)
        .on_conflict(
            OnConflict::column(user::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    let seller = user::Entity::find()
        .filter(user::Column::Email.eq("demo.shop@example.com"))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("demo shop".to_owned()))?;

    let lien_quan = game::Entity::find()
        .filter(game::Column::Slug.eq("lien-quan-mobile"))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("seed game".to_owned()))?;

    // 3. Sample listings
    let listings = vec![
        ("Acc Liên Quân 50 tướng full trang phục hiếm", 450_000_i64),
        ("Acc Liên Quân rank Cao Thủ, 80 tướng", 1_200_000_i64),
    ];

    for (title, price) in listings {
        let slug = slugify(title);
        let exists = acc::Entity::find()
            .filter(acc::Column::Slug.eq(slug.clone()))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let model = acc::ActiveModel {
            title: Set(title.to_owned()),
            slug: Set(slug),
            price: Set(price),
            original_price: Set(None),
            game_id: Set(lien_quan.id),
            seller_id: Set(seller.id),
            images: Set("[]".to_owned()),
            attributes: Set("[]".to_owned()),
            status: Set("APPROVED".to_owned()),
            views: Set(0),
            admin_note: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            approved_at: Set(Some(now.clone())),
            sold_at: Set(None),
            ..Default::default()
        };
        model.insert(db).await?;
    }

    Ok(())
}
