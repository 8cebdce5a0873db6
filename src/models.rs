//! Domain value types shared by the store, the engines and the state manager.
//!
//! The persisted records themselves are the `SeaORM` models in [`crate::entities`];
//! this module holds the enums they use plus the input and derived types that are never
//! stored as rows.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Direction of a transaction. Amounts are always non-negative; the sign lives here.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming into the business
    #[sea_orm(string_value = "income")]
    Income,
    /// Money leaving the business
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl TransactionType {
    /// Lowercase wire name, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(Error::Validation {
                message: format!("Unknown transaction type '{other}'"),
            }),
        }
    }
}

/// How a transaction was entered. Descriptive only.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    /// Typed into a form
    #[default]
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Filled from a voice capture
    #[sea_orm(string_value = "voice")]
    Voice,
    /// Filled from a receipt photo
    #[sea_orm(string_value = "photo")]
    Photo,
}

impl InputMethod {
    /// Lowercase wire name, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Voice => "voice",
            Self::Photo => "photo",
        }
    }
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated identity supplied by whatever signs the user in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Store-side owner id for every record this session touches
    pub user_id: String,
}

impl Session {
    /// Builds a session, rejecting a blank user id.
    pub fn new(user_id: impl Into<String>) -> Result<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(Error::NotAuthenticated);
        }
        Ok(Self {
            user_id: user_id.trim().to_string(),
        })
    }
}

/// A transaction as entered, before the store assigns id, owner and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Non-negative amount
    pub amount: f64,
    /// Required free-text label
    pub description: String,
    /// Category name
    pub category: String,
    /// Calendar date of the transaction
    pub date: NaiveDate,
    /// Provenance tag
    #[serde(default)]
    pub input_method: InputMethod,
    /// Optional link to a stored receipt image
    #[serde(default)]
    pub receipt_image_url: Option<String>,
}

impl NewTransaction {
    /// Creates a manually entered transaction.
    #[must_use]
    pub fn new(
        kind: TransactionType,
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            amount,
            description: description.into(),
            category: category.into(),
            date,
            input_method: InputMethod::Manual,
            receipt_image_url: None,
        }
    }

    /// Sets the provenance tag.
    #[must_use]
    pub fn with_input_method(mut self, input_method: InputMethod) -> Self {
        self.input_method = input_method;
        self
    }

    /// Checks the fields a submission form would block on.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] for negative or non-finite amounts and
    /// [`Error::Validation`] for a blank description or category.
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        validate_text("description", &self.description)?;
        validate_text("category", &self.category)
    }
}

/// Partial update; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    /// New direction
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    /// New amount
    pub amount: Option<f64>,
    /// New description
    pub description: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New date
    pub date: Option<NaiveDate>,
    /// New provenance tag
    pub input_method: Option<InputMethod>,
}

impl TransactionPatch {
    /// True when the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.input_method.is_none()
    }

    /// Validates the fields that are present.
    ///
    /// # Errors
    /// Same rules as [`NewTransaction::validate`], applied per present field.
    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let Some(description) = &self.description {
            validate_text("description", description)?;
        }
        if let Some(category) = &self.category {
            validate_text("category", category)?;
        }
        Ok(())
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation {
            message: format!("{field} cannot be empty"),
        });
    }
    Ok(())
}

/// Derived totals. Never persisted, always recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Sum of income amounts
    pub total_income: f64,
    /// Sum of expense amounts
    pub total_expenses: f64,
    /// `total_income - total_expenses`
    pub net_profit: f64,
}

impl FinancialSummary {
    /// Builds a summary from the two totals, deriving net profit.
    #[must_use]
    pub fn from_totals(total_income: f64, total_expenses: f64) -> Self {
        Self {
            total_income,
            total_expenses,
            net_profit: total_income - total_expenses,
        }
    }
}
