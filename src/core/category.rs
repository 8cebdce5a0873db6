//! Category business logic - per-user category lists and seeding from configuration.

use crate::{
    config::settings::CategoryConfig,
    entities::{Category, category},
    errors::Result,
    models::TransactionType,
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::info;

/// Category used when neither the caller nor the user's list supplies one
pub const FALLBACK_CATEGORY: &str = "Other";

/// Lists the user's categories ordered by name, optionally for one transaction type.
pub async fn get_categories(
    db: &DatabaseConnection,
    user_id: &str,
    kind: Option<TransactionType>,
) -> Result<Vec<category::Model>> {
    let mut query = Category::find().filter(category::Column::UserId.eq(user_id));
    if let Some(kind) = kind {
        query = query.filter(category::Column::Kind.eq(kind));
    }
    query
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Inserts the configured categories for a user who has none yet.
///
/// Returns how many categories were inserted; a user who already has categories is left
/// untouched and gets 0.
pub async fn seed_default_categories(
    db: &DatabaseConnection,
    user_id: &str,
    categories: &[CategoryConfig],
) -> Result<usize> {
    let existing = Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    if existing > 0 || categories.is_empty() {
        return Ok(0);
    }

    let now = chrono::Utc::now();
    let rows = categories.iter().map(|c| category::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(c.name.clone()),
        kind: Set(c.kind),
        color: Set(c.color.clone()),
        created_at: Set(now),
        ..Default::default()
    });
    Category::insert_many(rows).exec(db).await?;

    info!("Seeded {} categories for user {user_id}", categories.len());
    Ok(categories.len())
}

/// Picks the category to store: the requested one when it is not blank, otherwise the
/// first available category, otherwise [`FALLBACK_CATEGORY`].
#[must_use]
pub fn resolve_category(requested: &str, available: &[category::Model]) -> String {
    let requested = requested.trim();
    if !requested.is_empty() {
        return requested.to_string();
    }
    available
        .first()
        .map_or_else(|| FALLBACK_CATEGORY.to_string(), |c| c.name.clone())
}
