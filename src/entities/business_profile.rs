//! Business profile entity - one row per user holding the business name and currency label.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Business profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "business_profiles")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner, one profile per user
    #[sea_orm(unique)]
    pub user_id: String,
    /// Name shown on reports
    pub business_name: String,
    /// Currency label prefixed to formatted amounts (e.g. `KSh`)
    pub currency: String,
    /// When the profile was created
    pub created_at: DateTimeUtc,
    /// When the profile was last modified
    pub updated_at: DateTimeUtc,
}

/// `BusinessProfile` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
