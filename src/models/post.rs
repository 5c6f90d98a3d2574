use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// News article, created by the RSS cron or manual import and
/// moderated by an admin before publication.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub thumbnail: Option<String>,
    pub game: Option<String>, // free-text tag, not a FK
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    #[sea_orm(default_value = "DRAFT")]
    pub status: String,
    pub views: i32,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub thumbnail: Option<String>,
    pub game: Option<String>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub status: String,
    pub views: i32,
    pub published_at: Option<String>,
    pub created_at: String,
}

impl PostDto {
    /// Listing variant without the article body.
    pub fn summary(model: Model) -> Self {
        let mut dto = Self::from(model);
        dto.content = None;
        dto
    }
}

impl From<Model> for PostDto {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            content: Some(model.content),
            excerpt: model.excerpt,
            thumbnail: model.thumbnail,
            game: model.game,
            source_url: model.source_url,
            source_name: model.source_name,
            status: model.status,
            views: model.views,
            published_at: model.published_at,
            created_at: model.created_at,
        }
    }
}
