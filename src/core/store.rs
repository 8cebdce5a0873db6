//! Record store interface.
//!
//! [`TransactionStore`] is everything the state manager needs from a backend. Every call takes
//! the caller's [`Session`] and only ever sees that user's records.
//!
//! Two implementations ship with the crate: [`SeaOrmStore`] over a `SeaORM` connection, and
//! [`MemoryStore`], which keeps records in process memory for demos and offline use.

use crate::{
    core::{
        aggregation, category as category_ops, filter::TransactionFilter, profile,
        transaction as transaction_ops,
    },
    entities::{business_profile, category, transaction},
    errors::{Error, Result},
    models::{FinancialSummary, NewTransaction, Session, TransactionPatch, TransactionType},
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use std::{cmp::Reverse, future::Future};
use tokio::sync::RwLock;

/// Abstract access to the user's transactions and their supporting records.
pub trait TransactionStore: Send + Sync {
    /// Transactions matching `filter`, newest first.
    fn list(
        &self,
        session: &Session,
        filter: &TransactionFilter,
    ) -> impl Future<Output = Result<Vec<transaction::Model>>> + Send;

    /// Stores a new transaction, assigning id and timestamps.
    fn create(
        &self,
        session: &Session,
        new: NewTransaction,
    ) -> impl Future<Output = Result<transaction::Model>> + Send;

    /// Applies a partial update and returns the stored record.
    fn update(
        &self,
        session: &Session,
        id: i64,
        patch: TransactionPatch,
    ) -> impl Future<Output = Result<transaction::Model>> + Send;

    /// Removes a transaction.
    fn delete(&self, session: &Session, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Totals over all of the user's transactions, independent of any filter.
    fn summary(&self, session: &Session) -> impl Future<Output = Result<FinancialSummary>> + Send;

    /// The user's categories ordered by name, optionally for one type.
    fn categories(
        &self,
        session: &Session,
        kind: Option<TransactionType>,
    ) -> impl Future<Output = Result<Vec<category::Model>>> + Send;

    /// The user's business profile.
    fn business_profile(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<business_profile::Model>> + Send;
}

/// Store backed by a `SeaORM` database connection.
#[derive(Debug)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    /// Wraps an open connection whose tables already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection, for bootstrap work such as seeding.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TransactionStore for SeaOrmStore {
    async fn list(
        &self,
        session: &Session,
        filter: &TransactionFilter,
    ) -> Result<Vec<transaction::Model>> {
        transaction_ops::list_transactions(&self.db, &session.user_id, filter).await
    }

    async fn create(&self, session: &Session, new: NewTransaction) -> Result<transaction::Model> {
        transaction_ops::create_transaction(&self.db, &session.user_id, new).await
    }

    async fn update(
        &self,
        session: &Session,
        id: i64,
        patch: TransactionPatch,
    ) -> Result<transaction::Model> {
        transaction_ops::update_transaction(&self.db, &session.user_id, id, patch).await
    }

    async fn delete(&self, session: &Session, id: i64) -> Result<()> {
        transaction_ops::delete_transaction(&self.db, &session.user_id, id).await
    }

    async fn summary(&self, session: &Session) -> Result<FinancialSummary> {
        transaction_ops::get_financial_summary(&self.db, &session.user_id).await
    }

    async fn categories(
        &self,
        session: &Session,
        kind: Option<TransactionType>,
    ) -> Result<Vec<category::Model>> {
        category_ops::get_categories(&self.db, &session.user_id, kind).await
    }

    async fn business_profile(&self, session: &Session) -> Result<business_profile::Model> {
        profile::get_business_profile(&self.db, &session.user_id).await
    }
}

#[derive(Debug, Default)]
struct MemoryData {
    next_id: i64,
    transactions: Vec<transaction::Model>,
    categories: Vec<category::Model>,
    profiles: Vec<business_profile::Model>,
}

impl MemoryData {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category for `user_id`.
    pub async fn add_category(
        &self,
        user_id: &str,
        name: &str,
        kind: TransactionType,
        color: &str,
    ) -> category::Model {
        let mut data = self.data.write().await;
        let record = category::Model {
            id: data.allocate_id(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            kind,
            color: color.to_string(),
            created_at: Utc::now(),
        };
        data.categories.push(record.clone());
        record
    }

    /// Sets the business profile for `user_id`, replacing any existing one.
    pub async fn set_business_profile(
        &self,
        user_id: &str,
        business_name: &str,
        currency: &str,
    ) -> business_profile::Model {
        let mut data = self.data.write().await;
        let now = Utc::now();
        let record = business_profile::Model {
            id: data.allocate_id(),
            user_id: user_id.to_string(),
            business_name: business_name.to_string(),
            currency: currency.to_string(),
            created_at: now,
            updated_at: now,
        };
        data.profiles.retain(|p| p.user_id != user_id);
        data.profiles.push(record.clone());
        record
    }
}

impl TransactionStore for MemoryStore {
    async fn list(
        &self,
        session: &Session,
        filter: &TransactionFilter,
    ) -> Result<Vec<transaction::Model>> {
        let data = self.data.read().await;
        let mut matching: Vec<transaction::Model> = data
            .transactions
            .iter()
            .filter(|t| t.user_id == session.user_id && filter.matches(t))
            .cloned()
            .collect();
        matching.sort_by_key(|t| Reverse((t.date, t.id)));
        Ok(matching)
    }

    async fn create(&self, session: &Session, new: NewTransaction) -> Result<transaction::Model> {
        new.validate()?;
        let mut data = self.data.write().await;
        let now = Utc::now();
        let record = transaction::Model {
            id: data.allocate_id(),
            user_id: session.user_id.clone(),
            kind: new.kind,
            amount: new.amount,
            description: new.description.trim().to_string(),
            category: new.category.trim().to_string(),
            date: new.date,
            input_method: new.input_method,
            receipt_image_url: new.receipt_image_url,
            created_at: now,
            updated_at: now,
        };
        data.transactions.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        session: &Session,
        id: i64,
        patch: TransactionPatch,
    ) -> Result<transaction::Model> {
        patch.validate()?;
        let mut data = self.data.write().await;
        let record = data
            .transactions
            .iter_mut()
            .find(|t| t.id == id && t.user_id == session.user_id)
            .ok_or(Error::TransactionNotFound { id })?;

        if let Some(kind) = patch.kind {
            record.kind = kind;
        }
        if let Some(amount) = patch.amount {
            record.amount = amount;
        }
        if let Some(description) = patch.description {
            record.description = description.trim().to_string();
        }
        if let Some(category) = patch.category {
            record.category = category.trim().to_string();
        }
        if let Some(date) = patch.date {
            record.date = date;
        }
        if let Some(input_method) = patch.input_method {
            record.input_method = input_method;
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, session: &Session, id: i64) -> Result<()> {
        let mut data = self.data.write().await;
        let before = data.transactions.len();
        data.transactions
            .retain(|t| !(t.id == id && t.user_id == session.user_id));
        if data.transactions.len() == before {
            return Err(Error::TransactionNotFound { id });
        }
        Ok(())
    }

    async fn summary(&self, session: &Session) -> Result<FinancialSummary> {
        let data = self.data.read().await;
        let mine: Vec<transaction::Model> = data
            .transactions
            .iter()
            .filter(|t| t.user_id == session.user_id)
            .cloned()
            .collect();
        Ok(aggregation::summarize(&mine))
    }

    async fn categories(
        &self,
        session: &Session,
        kind: Option<TransactionType>,
    ) -> Result<Vec<category::Model>> {
        let data = self.data.read().await;
        let mut matching: Vec<category::Model> = data
            .categories
            .iter()
            .filter(|c| c.user_id == session.user_id && kind.is_none_or(|k| c.kind == k))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching)
    }

    async fn business_profile(&self, session: &Session) -> Result<business_profile::Model> {
        let data = self.data.read().await;
        data.profiles
            .iter()
            .find(|p| p.user_id == session.user_id)
            .cloned()
            .ok_or_else(|| Error::ProfileNotFound {
                user_id: session.user_id.clone(),
            })
    }
}
