use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user account. Shop fields stay NULL until the one-time
/// "create shop" mutation fills them in.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    #[sea_orm(default_value = "SELLER")]
    pub role: String,
    #[sea_orm(default_value = "PENDING")]
    pub status: String,
    pub shop_name: Option<String>,
    pub shop_slug: Option<String>,
    pub shop_description: Option<String>,
    pub shop_avatar: Option<String>,
    pub shop_cover: Option<String>,
    pub featured_games: Option<String>, // JSON array, max 3 entries
    pub is_verified: bool,
    pub is_vip_shop: bool,
    pub vip_shop_end_time: Option<String>,
    pub is_strategic_partner: bool,
    pub partner_tier: Option<String>,
    pub partner_since: Option<String>,
    pub commission_rate: f64,
    pub rating: f64,
    pub total_reviews: i32,
    pub total_sales: i32,
    pub total_views: i32,
    pub created_at: String,
    pub updated_at: String,
    pub last_active_at: String,
    pub approved_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::acc::Entity")]
    Accs,
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::acc::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accs.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Public shop profile as returned by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShopDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: String,
    pub status: String,
    pub shop_name: Option<String>,
    pub shop_slug: Option<String>,
    pub shop_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_cover: Option<String>,
    pub featured_games: Vec<String>,
    pub is_verified: bool,
    pub is_vip_shop: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip_shop_end_time: Option<String>,
    pub is_strategic_partner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_since: Option<String>,
    pub commission_rate: f64,
    pub rating: f64,
    pub total_reviews: i32,
    pub total_sales: i32,
    pub total_views: i32,
    pub created_at: String,
}

impl From<Model> for ShopDto {
    fn from(model: Model) -> Self {
        let featured_games: Vec<String> = model
            .featured_games
            .map(|s| serde_json::from_str(&s).unwrap_or_default())
            .unwrap_or_default();

        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            avatar: model.avatar,
            role: model.role,
            status: model.status,
            shop_name: model.shop_name,
            shop_slug: model.shop_slug,
            shop_description: model.shop_description,
            shop_avatar: model.shop_avatar,
            shop_cover: model.shop_cover,
            featured_games,
            is_verified: model.is_verified,
            is_vip_shop: model.is_vip_shop,
            vip_shop_end_time: model.vip_shop_end_time,
            is_strategic_partner: model.is_strategic_partner,
            partner_tier: model.partner_tier,
            partner_since: model.partner_since,
            commission_rate: model.commission_rate,
            rating: model.rating,
            total_reviews: model.total_reviews,
            total_sales: model.total_sales,
            total_views: model.total_views,
            created_at: model.created_at,
        }
    }
}
