//! Category entity - per-user category names, split by transaction type.

use crate::models::TransactionType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the category
    pub user_id: String,
    /// Display name, matched against `transactions.category`
    pub name: String,
    /// Which transaction type this category belongs to
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Chart colour, e.g. `#10B981`
    pub color: String,
    /// When the category was created
    pub created_at: DateTimeUtc,
}

/// `Category` has no foreign keys
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
