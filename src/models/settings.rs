use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Singleton site configuration row (id = "main"), created lazily
/// with defaults on first read.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub facebook_url: Option<String>,
    pub zalo_url: Option<String>,
    pub discord_url: Option<String>,
    pub youtube_url: Option<String>,
    pub telegram_url: Option<String>,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const SETTINGS_ID: &str = "main";
