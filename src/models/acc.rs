use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A game-account listing ("acc") offered for sale by one shop.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    pub price: i64,
    pub original_price: Option<i64>,
    pub game_id: i32,
    pub seller_id: i32,
    pub images: String,     // JSON array of URLs, max 15
    pub attributes: String, // JSON array of {label, value} pairs
    #[sea_orm(default_value = "PENDING")]
    pub status: String,
    pub views: i32,
    pub admin_note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub approved_at: Option<String>,
    pub sold_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::game::Entity",
        from = "Column::GameId",
        to = "super::game::Column::Id"
    )]
    Game,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SellerId",
        to = "super::user::Column::Id"
    )]
    Seller,
}

impl Related<super::game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One game-specific attribute on a listing (rank, level, skin count...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccAttribute {
    pub label: String,
    pub value: String,
}

// DTO for API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct Acc {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<i64>,
    pub game_id: i32,
    pub seller_id: i32,
    pub images: Vec<String>,
    pub attributes: Vec<AccAttribute>,
    pub status: String,
    pub views: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sold_at: Option<String>,
}

impl From<Model> for Acc {
    fn from(model: Model) -> Self {
        let images: Vec<String> = serde_json::from_str(&model.images).unwrap_or_default();
        let attributes: Vec<AccAttribute> =
            serde_json::from_str(&model.attributes).unwrap_or_default();

        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            description: model.description,
            price: model.price,
            original_price: model.original_price,
            game_id: model.game_id,
            seller_id: model.seller_id,
            images,
            attributes,
            status: model.status,
            views: model.views,
            admin_note: model.admin_note,
            created_at: model.created_at,
            approved_at: model.approved_at,
            sold_at: model.sold_at,
        }
    }
}
