use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog entry for a supported game.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub icon: Option<String>,
    pub fields_schema: String, // JSON array describing per-game listing attributes
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::acc::Entity")]
    Accs,
}

impl Related<super::acc::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize)]
pub struct GameDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub fields_schema: serde_json::Value,
    pub is_active: bool,
    pub sort_order: i32,
}

impl From<Model> for GameDto {
    fn from(model: Model) -> Self {
        let fields_schema = serde_json::from_str(&model.fields_schema)
            .unwrap_or(serde_json::Value::Array(Vec::new()));

        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            icon: model.icon,
            fields_schema,
            is_active: model.is_active,
            sort_order: model.sort_order,
        }
    }
}
