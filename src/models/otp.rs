use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One-time email verification code. Expires after 5 minutes,
/// at most 3 verification attempts per code.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "otp_verifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub email: String,
    pub code: String,
    pub expires_at: String,
    pub attempts: i32,
    pub verified: bool,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
