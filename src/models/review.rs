use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rating: i32, // 1..=5
    pub content: Option<String>,
    pub buyer_name: String,
    pub seller_id: i32,
    pub is_verified: bool,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SellerId",
        to = "super::user::Column::Id"
    )]
    Seller,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewDto {
    pub id: i32,
    pub rating: i32,
    pub content: Option<String>,
    pub buyer_name: String,
    pub seller_id: i32,
    pub is_verified: bool,
    pub created_at: String,
}

impl From<Model> for ReviewDto {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            rating: model.rating,
            content: model.content,
            buyer_name: model.buyer_name,
            seller_id: model.seller_id,
            is_verified: model.is_verified,
            created_at: model.created_at,
        }
    }
}
