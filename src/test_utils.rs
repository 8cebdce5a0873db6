//! Shared test utilities for biztrack.
//!
//! Helpers for setting up an in-memory database, a signed-in session, and literal
//! transaction records with sensible defaults.
#![allow(clippy::unwrap_used)]

use crate::{
    core::store::{SeaOrmStore, TransactionStore},
    entities::transaction,
    errors::Result,
    models::{InputMethod, NewTransaction, Session, TransactionType},
};
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// User id used by every test session
pub const TEST_USER: &str = "test_user";

/// Parses a `YYYY-MM-DD` literal.
pub fn date(ymd: &str) -> NaiveDate {
    NaiveDate::parse_from_str(ymd, "%Y-%m-%d").unwrap()
}

/// Session for [`TEST_USER`].
pub fn test_session() -> Session {
    Session::new(TEST_USER).unwrap()
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// In-memory database wrapped in a store, plus the test session.
pub async fn setup_test_store() -> Result<(SeaOrmStore, Session)> {
    let db = setup_test_db().await?;
    Ok((SeaOrmStore::new(db), test_session()))
}

/// Builds a transaction record without touching a database.
///
/// # Defaults
/// * `user_id`: [`TEST_USER`]
/// * `input_method`: manual
/// * timestamps: midnight UTC of `date`
pub fn record(
    id: i64,
    kind: TransactionType,
    amount: f64,
    description: &str,
    category: &str,
    ymd: &str,
) -> transaction::Model {
    let day = date(ymd);
    let stamp = Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap());
    transaction::Model {
        id,
        user_id: TEST_USER.to_string(),
        kind,
        amount,
        description: description.to_string(),
        category: category.to_string(),
        date: day,
        input_method: InputMethod::Manual,
        receipt_image_url: None,
        created_at: stamp,
        updated_at: stamp,
    }
}

/// A mixed list spanning two years, in date-descending order like the store returns.
pub fn sample_transactions() -> Vec<transaction::Model> {
    use TransactionType::{Expense, Income};
    vec![
        record(1, Income, 2500.0, "Client payment for web design", "Services", "2024-02-20"),
        record(2, Expense, 150.0, "Office supplies from Staples", "Supplies", "2024-02-19"),
        record(3, Expense, 89.0, "Business lunch with client", "Marketing", "2024-01-18"),
        record(4, Income, 1200.0, "Logo design project", "Services", "2024-01-17"),
        record(5, Income, 300.0, "Market day sales", "Sales", "2024-01-05"),
        record(6, Expense, 45.5, "Fuel for deliveries", "Transport", "2023-12-30"),
        record(7, Income, 75.25, "Lunch catering", "Sales", "2023-12-02"),
    ]
}

/// Builds a manually entered transaction ready to submit.
pub fn new_transaction(
    kind: TransactionType,
    amount: f64,
    description: &str,
    category: &str,
    ymd: &str,
) -> NewTransaction {
    NewTransaction::new(kind, amount, description, category, date(ymd))
}

/// Inserts every [`sample_transactions`] entry through the store, oldest first,
/// and returns the created records.
pub async fn seed_sample_transactions(
    store: &SeaOrmStore,
    session: &Session,
) -> Result<Vec<transaction::Model>> {
    let mut created = Vec::new();
    for sample in sample_transactions().into_iter().rev() {
        let new = NewTransaction::new(
            sample.kind,
            sample.amount,
            sample.description,
            sample.category,
            sample.date,
        );
        created.push(store.create(session, new).await?);
    }
    Ok(created)
}
