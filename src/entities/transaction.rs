//! Transaction entity - the sole business record of the tracker.
//!
//! Each row carries its owner (`user_id`), direction (`type`), a non-negative amount,
//! a description, a category name, the calendar date, and the `input_method` provenance tag.
//! Direction is never encoded in the sign of `amount`.
use crate::models::{InputMethod, TransactionType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier assigned on insert
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the transaction
    pub user_id: String,
    /// `income` or `expense`
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Non-negative amount
    pub amount: f64,
    /// Human-readable description of the transaction
    pub description: String,
    /// Category name
    pub category: String,
    /// Calendar date the transaction belongs to
    pub date: Date,
    /// How the transaction was entered
    pub input_method: InputMethod,
    /// Optional receipt image reference
    pub receipt_image_url: Option<String>,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
}

/// Transactions reference categories by name only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
