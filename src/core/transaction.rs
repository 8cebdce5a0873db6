//! Transaction persistence - create, list, update and delete against the database.
//!
//! Every function is scoped to one owner (`user_id`); a record belonging to someone else is
//! reported as not found. Listing applies a [`TransactionFilter`] in the query and always
//! orders newest first (date descending, then id descending) so results line up with
//! client-side filtering of the same list.

use crate::{
    core::{aggregation, filter::TransactionFilter},
    entities::{Transaction, transaction},
    errors::{Error, Result},
    models::{FinancialSummary, NewTransaction, TransactionPatch},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Inserts a validated transaction for `user_id` and returns the stored row.
///
/// The description and category are trimmed. Id and both timestamps are assigned here.
pub async fn create_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    new: NewTransaction,
) -> Result<transaction::Model> {
    new.validate()?;

    let now = chrono::Utc::now();
    let model = transaction::ActiveModel {
        user_id: Set(user_id.to_string()),
        kind: Set(new.kind),
        amount: Set(new.amount),
        description: Set(new.description.trim().to_string()),
        category: Set(new.category.trim().to_string()),
        date: Set(new.date),
        input_method: Set(new.input_method),
        receipt_image_url: Set(new.receipt_image_url),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    debug!(id = created.id, kind = %created.kind, "Created transaction");
    Ok(created)
}

/// Lists the user's transactions matching `filter`, newest first.
pub async fn list_transactions(
    db: &DatabaseConnection,
    user_id: &str,
    filter: &TransactionFilter,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(filter.to_condition())
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one of the user's transactions by id.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    user_id: &str,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Applies the present fields of `patch` and bumps `updated_at`.
pub async fn update_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    transaction_id: i64,
    patch: TransactionPatch,
) -> Result<transaction::Model> {
    patch.validate()?;

    let existing = get_transaction_by_id(db, user_id, transaction_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    let mut active: transaction::ActiveModel = existing.into();
    if let Some(kind) = patch.kind {
        active.kind = Set(kind);
    }
    if let Some(amount) = patch.amount {
        active.amount = Set(amount);
    }
    if let Some(description) = patch.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(category) = patch.category {
        active.category = Set(category.trim().to_string());
    }
    if let Some(date) = patch.date {
        active.date = Set(date);
    }
    if let Some(input_method) = patch.input_method {
        active.input_method = Set(input_method);
    }
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(db).await?;
    debug!(id = updated.id, "Updated transaction");
    Ok(updated)
}

/// Deletes one of the user's transactions.
pub async fn delete_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    transaction_id: i64,
) -> Result<()> {
    let result = Transaction::delete_many()
        .filter(transaction::Column::Id.eq(transaction_id))
        .filter(transaction::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::TransactionNotFound { id: transaction_id });
    }
    debug!(id = transaction_id, "Deleted transaction");
    Ok(())
}

/// Totals over every transaction the user owns, ignoring any filter.
pub async fn get_financial_summary(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<FinancialSummary> {
    let all = Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    Ok(aggregation::summarize(&all))
}
