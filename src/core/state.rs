//! Transaction state manager.
//!
//! Holds the in-memory transaction list for one signed-in session together with the summary
//! derived from it, and the loading/error status of the last store call. Every change goes
//! through [`reduce`], which applies one [`Action`] under a single write guard and recomputes
//! the summary, so readers never observe a list and a summary that disagree.
//!
//! Loads are sequenced: each call to [`TransactionStateManager::load`] takes a fresh request
//! number, and a response is only applied if no newer load was issued while it was in flight.
//! Mutations and summary refreshes carry the sign-in epoch they started under and are dropped
//! if [`TransactionStateManager::sign_out`] ran before they resolved.

use crate::{
    config::settings::StateConfig,
    core::{aggregation, filter::TransactionFilter, store::TransactionStore},
    entities::transaction,
    errors::{Error, Result},
    models::{FinancialSummary, NewTransaction, Session, TransactionPatch},
};
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Where the last fetch stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A load is in flight
    Loading,
    /// The last load succeeded
    Ready,
    /// The last operation failed; see [`TransactionState::error`]
    Error,
}

/// Snapshot of everything a view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionState {
    /// Fetch status
    pub status: LoadStatus,
    /// Cached transactions, newest first
    pub transactions: Vec<transaction::Model>,
    /// Totals over [`Self::transactions`]; reflects the active filter
    pub summary: FinancialSummary,
    /// Totals over every transaction the user owns, as last reported by the store
    pub account_summary: Option<FinancialSummary>,
    /// Filter the current list was loaded with
    pub filter: TransactionFilter,
    /// Message from the most recent failure
    pub error: Option<String>,
}

impl TransactionState {
    /// True while a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

/// One atomic change to [`TransactionState`].
#[derive(Debug, Clone)]
pub enum Action {
    /// A load was dispatched
    LoadStarted,
    /// A load resolved successfully
    Loaded {
        /// Records returned by the store
        transactions: Vec<transaction::Model>,
        /// Filter they were fetched with
        filter: TransactionFilter,
    },
    /// An operation failed with this message
    Failed(String),
    /// The store confirmed a new record
    Added(transaction::Model),
    /// The store confirmed an update
    Updated(transaction::Model),
    /// The store confirmed a deletion
    Deleted(i64),
    /// Fresh account-wide totals from the store
    AccountSummary(FinancialSummary),
    /// Drop everything (sign-out)
    Reset,
}

/// Applies one action to the state.
pub fn reduce(state: &mut TransactionState, action: Action) {
    match action {
        Action::LoadStarted => {
            state.status = LoadStatus::Loading;
        }
        Action::Loaded {
            transactions,
            filter,
        } => {
            state.transactions = transactions;
            state.filter = filter;
            state.status = LoadStatus::Ready;
            state.error = None;
        }
        Action::Failed(message) => {
            state.status = LoadStatus::Error;
            state.error = Some(message);
        }
        Action::Added(record) => {
            state.transactions.insert(0, record);
            mark_mutation_succeeded(state);
        }
        Action::Updated(record) => {
            if let Some(slot) = state.transactions.iter_mut().find(|t| t.id == record.id) {
                *slot = record;
            }
            mark_mutation_succeeded(state);
        }
        Action::Deleted(id) => {
            state.transactions.retain(|t| t.id != id);
            mark_mutation_succeeded(state);
        }
        Action::AccountSummary(summary) => {
            state.account_summary = Some(summary);
        }
        Action::Reset => {
            *state = TransactionState::default();
        }
    }
    state.summary = aggregation::summarize(&state.transactions);
}

fn mark_mutation_succeeded(state: &mut TransactionState) {
    state.error = None;
    if state.status != LoadStatus::Loading {
        state.status = LoadStatus::Ready;
    }
}

/// What happened to a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the cached list
    Applied,
    /// The store failed; the error was recorded and old data kept
    Failed,
    /// A newer load was issued before this one resolved
    Stale,
    /// A newer debounced request arrived during the quiet period
    Superseded,
    /// No session; nothing was requested
    Skipped,
}

/// Session-scoped owner of the transaction cache.
///
/// Construct one per signed-in session and pass it by reference to whatever renders it;
/// [`Self::sign_out`] tears it down.
#[derive(Debug)]
pub struct TransactionStateManager<S> {
    store: S,
    session: RwLock<Option<Session>>,
    state: RwLock<TransactionState>,
    latest_request: AtomicU64,
    latest_debounce: AtomicU64,
    epoch: AtomicU64,
    debounce: Duration,
}

impl<S: TransactionStore> TransactionStateManager<S> {
    /// Creates a manager for `session` using the configured search debounce.
    pub fn new(store: S, session: Session, config: &StateConfig) -> Self {
        Self::with_debounce(
            store,
            session,
            Duration::from_millis(config.search_debounce_ms),
        )
    }

    /// Creates a manager with an explicit search debounce.
    pub fn with_debounce(store: S, session: Session, debounce: Duration) -> Self {
        info!("Starting transaction state for user {}", session.user_id);
        Self {
            store,
            session: RwLock::new(Some(session)),
            state: RwLock::new(TransactionState::default()),
            latest_request: AtomicU64::new(0),
            latest_debounce: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
            debounce,
        }
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The current session, or `None` after sign-out.
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> TransactionState {
        self.state.read().await.clone()
    }

    async fn dispatch(&self, action: Action) {
        let mut state = self.state.write().await;
        reduce(&mut state, action);
    }

    /// Applies `action` only if no sign-out happened since `epoch` was read.
    async fn dispatch_in_epoch(&self, epoch: u64, action: Action) -> bool {
        let mut state = self.state.write().await;
        if epoch != self.epoch.load(Ordering::SeqCst) {
            debug!(epoch, "Dropping result that resolved after sign-out");
            return false;
        }
        reduce(&mut state, action);
        true
    }

    /// The session plus the epoch it belongs to. The epoch is read first so a sign-out in
    /// between always shows up as a mismatch later.
    async fn current_session(&self) -> Option<(Session, u64)> {
        let epoch = self.epoch.load(Ordering::SeqCst);
        self.session().await.map(|session| (session, epoch))
    }

    async fn require_session(&self) -> Result<(Session, u64)> {
        match self.current_session().await {
            Some(signed_in) => Ok(signed_in),
            None => {
                let err = Error::NotAuthenticated;
                self.dispatch(Action::Failed(err.to_string())).await;
                Err(err)
            }
        }
    }

    /// Fetches the list for `filter` and replaces the cache with it.
    ///
    /// Failures are recorded in the state rather than returned. A response is dropped if a
    /// newer load was issued while it was in flight.
    #[instrument(skip(self))]
    pub async fn load(&self, filter: TransactionFilter) -> LoadOutcome {
        let Some((session, epoch)) = self.current_session().await else {
            debug!("No session, skipping load");
            return LoadOutcome::Skipped;
        };

        let request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.dispatch_in_epoch(epoch, Action::LoadStarted).await {
            return LoadOutcome::Skipped;
        }

        let result = self.store.list(&session, &filter).await;

        let outcome = {
            let mut state = self.state.write().await;
            if request != self.latest_request.load(Ordering::SeqCst) {
                debug!(request, "Discarding stale load response");
                return LoadOutcome::Stale;
            }
            match result {
                Ok(transactions) => {
                    debug!(request, count = transactions.len(), "Load applied");
                    reduce(
                        &mut state,
                        Action::Loaded {
                            transactions,
                            filter,
                        },
                    );
                    LoadOutcome::Applied
                }
                Err(e) => {
                    error!("Failed to load transactions: {e}");
                    reduce(&mut state, Action::Failed(e.to_string()));
                    LoadOutcome::Failed
                }
            }
        };

        if outcome == LoadOutcome::Applied {
            self.refresh_summary().await;
        }
        outcome
    }

    /// Waits out the search debounce, then loads unless a newer debounced request arrived
    /// in the meantime.
    pub async fn load_debounced(&self, filter: TransactionFilter) -> LoadOutcome {
        let ticket = self.latest_debounce.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.debounce).await;
        if ticket != self.latest_debounce.load(Ordering::SeqCst) {
            debug!(ticket, "Debounced load superseded");
            return LoadOutcome::Superseded;
        }
        self.load(filter).await
    }

    /// Validates and stores a new transaction, then puts it at the front of the cache.
    ///
    /// # Errors
    /// Validation errors are returned without touching the store or the state. Store
    /// failures are recorded in the state and returned; the cached list is left unchanged.
    #[instrument(skip(self, new), fields(kind = %new.kind))]
    pub async fn add(&self, new: NewTransaction) -> Result<transaction::Model> {
        new.validate()?;
        let (session, epoch) = self.require_session().await?;

        match self.store.create(&session, new).await {
            Ok(created) => {
                info!(id = created.id, "Transaction added");
                if self
                    .dispatch_in_epoch(epoch, Action::Added(created.clone()))
                    .await
                {
                    self.refresh_summary().await;
                }
                Ok(created)
            }
            Err(e) => {
                error!("Failed to add transaction: {e}");
                self.dispatch_in_epoch(epoch, Action::Failed(e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    /// Applies a partial update and replaces the cached copy, if one is cached.
    ///
    /// # Errors
    /// Same policy as [`Self::add`].
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: TransactionPatch) -> Result<transaction::Model> {
        patch.validate()?;
        let (session, epoch) = self.require_session().await?;

        match self.store.update(&session, id, patch).await {
            Ok(updated) => {
                info!(id, "Transaction updated");
                if self
                    .dispatch_in_epoch(epoch, Action::Updated(updated.clone()))
                    .await
                {
                    self.refresh_summary().await;
                }
                Ok(updated)
            }
            Err(e) => {
                error!("Failed to update transaction {id}: {e}");
                self.dispatch_in_epoch(epoch, Action::Failed(e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    /// Deletes a transaction and removes it from the cache.
    ///
    /// # Errors
    /// Store failures are recorded in the state and returned.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let (session, epoch) = self.require_session().await?;

        match self.store.delete(&session, id).await {
            Ok(()) => {
                info!(id, "Transaction deleted");
                if self.dispatch_in_epoch(epoch, Action::Deleted(id)).await {
                    self.refresh_summary().await;
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete transaction {id}: {e}");
                self.dispatch_in_epoch(epoch, Action::Failed(e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    /// Re-fetches account-wide totals. Failures are logged and otherwise ignored.
    pub async fn refresh_summary(&self) {
        let Some((session, epoch)) = self.current_session().await else {
            return;
        };
        match self.store.summary(&session).await {
            Ok(summary) => {
                self.dispatch_in_epoch(epoch, Action::AccountSummary(summary))
                    .await;
            }
            Err(e) => warn!("Error refreshing summary: {e}"),
        }
    }

    /// Ends the session: clears the cache and drops every load, mutation result and summary
    /// refresh still in flight.
    pub async fn sign_out(&self) {
        let previous = {
            let mut state = self.state.write().await;
            let previous = self.session.write().await.take();
            self.epoch.fetch_add(1, Ordering::SeqCst);
            self.latest_request.fetch_add(1, Ordering::SeqCst);
            reduce(&mut state, Action::Reset);
            previous
        };
        if let Some(session) = previous {
            info!("Signed out user {}", session.user_id);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::store::MemoryStore,
        entities::{business_profile, category},
        models::TransactionType,
        test_utils::*,
    };
    use std::{
        collections::VecDeque,
        sync::{
            Mutex,
            atomic::{AtomicBool, AtomicUsize},
        },
    };
    use TransactionType::{Expense, Income};

    /// Memory store with switchable failures and scripted list latency.
    #[derive(Default)]
    struct ScriptedStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
        fail_lists: AtomicBool,
        fail_summary: AtomicBool,
        list_delays: Mutex<VecDeque<Duration>>,
        write_delay: Mutex<Option<Duration>>,
        create_calls: AtomicUsize,
    }

    impl ScriptedStore {
        fn backend_error() -> Error {
            Error::Store {
                message: "backend unavailable".to_string(),
            }
        }

        async fn before_write(&self) -> Result<()> {
            let delay = *self.write_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::backend_error());
            }
            Ok(())
        }

        fn delay_writes(&self, millis: u64) {
            *self.write_delay.lock().unwrap() = Some(Duration::from_millis(millis));
        }

        fn delay_next_lists(&self, delays: &[u64]) {
            let mut queue = self.list_delays.lock().unwrap();
            queue.extend(delays.iter().copied().map(Duration::from_millis));
        }
    }

    impl TransactionStore for ScriptedStore {
        async fn list(
            &self,
            session: &Session,
            filter: &TransactionFilter,
        ) -> Result<Vec<transaction::Model>> {
            let delay = self.list_delays.lock().unwrap().pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_lists.load(Ordering::SeqCst) {
                return Err(Self::backend_error());
            }
            self.inner.list(session, filter).await
        }

        async fn create(
            &self,
            session: &Session,
            new: NewTransaction,
        ) -> Result<transaction::Model> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.before_write().await?;
            self.inner.create(session, new).await
        }

        async fn update(
            &self,
            session: &Session,
            id: i64,
            patch: TransactionPatch,
        ) -> Result<transaction::Model> {
            self.before_write().await?;
            self.inner.update(session, id, patch).await
        }

        async fn delete(&self, session: &Session, id: i64) -> Result<()> {
            self.before_write().await?;
            self.inner.delete(session, id).await
        }

        async fn summary(&self, session: &Session) -> Result<FinancialSummary> {
            if self.fail_summary.load(Ordering::SeqCst) {
                return Err(Self::backend_error());
            }
            self.inner.summary(session).await
        }

        async fn categories(
            &self,
            session: &Session,
            kind: Option<TransactionType>,
        ) -> Result<Vec<category::Model>> {
            self.inner.categories(session, kind).await
        }

        async fn business_profile(&self, session: &Session) -> Result<business_profile::Model> {
            self.inner.business_profile(session).await
        }
    }

    fn manager(store: ScriptedStore) -> TransactionStateManager<ScriptedStore> {
        TransactionStateManager::with_debounce(store, test_session(), Duration::from_millis(300))
    }

    async fn seeded_manager() -> TransactionStateManager<ScriptedStore> {
        let manager = manager(ScriptedStore::default());
        let session = test_session();
        for sample in sample_transactions().into_iter().rev() {
            manager
                .store()
                .inner
                .create(
                    &session,
                    NewTransaction::new(
                        sample.kind,
                        sample.amount,
                        sample.description,
                        sample.category,
                        sample.date,
                    ),
                )
                .await
                .unwrap();
        }
        manager
    }

    #[test]
    fn test_reducer_recomputes_summary() {
        let mut state = TransactionState::default();
        reduce(
            &mut state,
            Action::Loaded {
                transactions: vec![
                    record(1, Income, 100.0, "Client payment", "Services", "2024-01-20"),
                    record(2, Expense, 40.0, "Supplies", "Supplies", "2024-01-19"),
                ],
                filter: TransactionFilter::new(),
            },
        );
        assert_eq!(state.status, LoadStatus::Ready);
        assert_eq!(state.summary, FinancialSummary::from_totals(100.0, 40.0));

        reduce(&mut state, Action::Deleted(2));
        assert_eq!(state.transactions.len(), 1);
        assert_eq!(state.summary.net_profit, 100.0);

        reduce(
            &mut state,
            Action::Added(record(3, Expense, 25.0, "Fuel", "Transport", "2024-01-21")),
        );
        assert_eq!(state.transactions[0].id, 3);
        assert_eq!(state.summary.net_profit, 75.0);
    }

    #[test]
    fn test_reducer_update_ignores_unknown_id() {
        let mut state = TransactionState::default();
        reduce(
            &mut state,
            Action::Added(record(1, Income, 10.0, "a", "Sales", "2024-01-01")),
        );
        let before = state.clone();
        reduce(
            &mut state,
            Action::Updated(record(99, Income, 500.0, "b", "Sales", "2024-01-01")),
        );
        assert_eq!(state.transactions, before.transactions);
        assert_eq!(state.summary, before.summary);
    }

    #[test]
    fn test_reducer_failure_keeps_data_and_overwrites_error() {
        let mut state = TransactionState::default();
        reduce(
            &mut state,
            Action::Added(record(1, Income, 10.0, "a", "Sales", "2024-01-01")),
        );
        reduce(&mut state, Action::Failed("first".to_string()));
        reduce(&mut state, Action::Failed("second".to_string()));
        assert_eq!(state.status, LoadStatus::Error);
        assert_eq!(state.error.as_deref(), Some("second"));
        assert_eq!(state.transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_load_populates_state_and_account_summary() {
        let manager = seeded_manager().await;
        assert_eq!(manager.snapshot().await.status, LoadStatus::Idle);

        let filter = TransactionFilter::new().with_kind(Some(Income));
        assert_eq!(manager.load(filter.clone()).await, LoadOutcome::Applied);

        let state = manager.snapshot().await;
        assert_eq!(state.status, LoadStatus::Ready);
        assert_eq!(state.filter, filter);
        assert_eq!(state.transactions.len(), 4);
        assert_eq!(state.summary.total_expenses, 0.0);
        assert_eq!(state.summary.total_income, 4075.25);

        let account = state.account_summary.unwrap();
        assert_eq!(account.total_income, 4075.25);
        assert_eq!(account.total_expenses, 284.5);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_data() {
        let manager = seeded_manager().await;
        manager.load(TransactionFilter::new()).await;
        let loaded = manager.snapshot().await;

        manager.store().fail_lists.store(true, Ordering::SeqCst);
        assert_eq!(
            manager.load(TransactionFilter::new().with_search("lunch")).await,
            LoadOutcome::Failed
        );

        let state = manager.snapshot().await;
        assert_eq!(state.status, LoadStatus::Error);
        assert_eq!(state.error.as_deref(), Some("backend unavailable"));
        assert_eq!(state.transactions, loaded.transactions);
        assert_eq!(state.summary, loaded.summary);
    }

    #[tokio::test]
    async fn test_add_prepends_and_recomputes() -> Result<()> {
        let manager = seeded_manager().await;
        manager.load(TransactionFilter::new()).await;
        let before = manager.snapshot().await;

        let created = manager
            .add(new_transaction(Income, 100.0, "Client payment", "Services", "2023-01-01"))
            .await?;

        let state = manager.snapshot().await;
        assert_eq!(state.transactions.len(), before.transactions.len() + 1);
        assert_eq!(state.transactions[0], created);
        assert_eq!(
            state.summary.total_income,
            before.summary.total_income + 100.0
        );
        assert_eq!(state.account_summary, Some(state.summary));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_failure_leaves_list_unchanged_and_raises() {
        let manager = seeded_manager().await;
        manager.load(TransactionFilter::new()).await;
        let before = manager.snapshot().await;

        manager.store().fail_writes.store(true, Ordering::SeqCst);
        let result = manager
            .add(new_transaction(Expense, 40.0, "Supplies", "Supplies", "2024-01-19"))
            .await;
        assert!(matches!(result, Err(Error::Store { message: _ })));

        let state = manager.snapshot().await;
        assert_eq!(state.transactions, before.transactions);
        assert_eq!(state.summary, before.summary);
        assert_eq!(state.error.as_deref(), Some("backend unavailable"));
    }

    #[tokio::test]
    async fn test_invalid_add_never_reaches_store() {
        let manager = seeded_manager().await;
        let result = manager
            .add(new_transaction(Expense, 40.0, "", "Supplies", "2024-01-19"))
            .await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));
        assert_eq!(manager.store().create_calls.load(Ordering::SeqCst), 0);
        assert!(manager.snapshot().await.error.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() -> Result<()> {
        let manager = seeded_manager().await;
        manager.load(TransactionFilter::new()).await;
        let before = manager.snapshot().await;
        let victim = before
            .transactions
            .iter()
            .find(|t| t.description == "Business lunch with client")
            .cloned()
            .unwrap();

        manager.delete(victim.id).await?;

        let state = manager.snapshot().await;
        assert_eq!(state.transactions.len(), before.transactions.len() - 1);
        assert!(state.transactions.iter().all(|t| t.id != victim.id));
        assert_eq!(
            state.summary.total_expenses,
            before.summary.total_expenses - victim.amount
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_failure_raises_and_records() {
        let manager = seeded_manager().await;
        manager.load(TransactionFilter::new()).await;
        let before = manager.snapshot().await;

        let result = manager.delete(9999).await;
        assert!(matches!(result, Err(Error::TransactionNotFound { id: 9999 })));

        let state = manager.snapshot().await;
        assert_eq!(state.transactions, before.transactions);
        assert_eq!(state.error.as_deref(), Some("Transaction not found: 9999"));
    }

    #[tokio::test]
    async fn test_update_replaces_cached_record() -> Result<()> {
        let manager = seeded_manager().await;
        manager.load(TransactionFilter::new()).await;
        let target = manager.snapshot().await.transactions[0].clone();

        let patch = TransactionPatch {
            amount: Some(target.amount + 10.0),
            ..Default::default()
        };
        let updated = manager.update(target.id, patch).await?;

        let state = manager.snapshot().await;
        assert_eq!(state.transactions[0], updated);
        assert_eq!(state.transactions[0].amount, target.amount + 10.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_of_uncached_record_is_local_noop() -> Result<()> {
        let manager = seeded_manager().await;
        manager
            .load(TransactionFilter::new().with_kind(Some(Income)))
            .await;
        let before = manager.snapshot().await;

        let expense = manager
            .store()
            .inner
            .list(&test_session(), &TransactionFilter::new().with_kind(Some(Expense)))
            .await?
            .remove(0);
        manager
            .update(
                expense.id,
                TransactionPatch {
                    description: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await?;

        let state = manager.snapshot().await;
        assert_eq!(state.transactions, before.transactions);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_load_response_is_discarded() {
        let manager = seeded_manager().await;
        manager.store().delay_next_lists(&[500, 10]);

        let slow = TransactionFilter::new().with_kind(Some(Expense));
        let fast = TransactionFilter::new().with_kind(Some(Income));
        let (first, second) = tokio::join!(manager.load(slow), async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            manager.load(fast.clone()).await
        });

        assert_eq!(first, LoadOutcome::Stale);
        assert_eq!(second, LoadOutcome::Applied);

        let state = manager.snapshot().await;
        assert_eq!(state.filter, fast);
        assert!(state.transactions.iter().all(|t| t.kind == Income));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_loads_only_apply_the_last_keystroke() {
        let manager = seeded_manager().await;

        let (first, second, third) = tokio::join!(
            manager.load_debounced(TransactionFilter::new().with_search("l")),
            async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                manager
                    .load_debounced(TransactionFilter::new().with_search("lu"))
                    .await
            },
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                manager
                    .load_debounced(TransactionFilter::new().with_search("lunch"))
                    .await
            },
        );

        assert_eq!(first, LoadOutcome::Superseded);
        assert_eq!(second, LoadOutcome::Superseded);
        assert_eq!(third, LoadOutcome::Applied);

        let state = manager.snapshot().await;
        assert_eq!(state.filter.search.as_deref(), Some("lunch"));
        assert_eq!(state.transactions.len(), 2);
    }

    #[tokio::test]
    async fn test_summary_refresh_errors_are_not_surfaced() {
        let manager = seeded_manager().await;
        manager.store().fail_summary.store(true, Ordering::SeqCst);

        assert_eq!(manager.load(TransactionFilter::new()).await, LoadOutcome::Applied);
        manager.refresh_summary().await;

        let state = manager.snapshot().await;
        assert_eq!(state.status, LoadStatus::Ready);
        assert!(state.error.is_none());
        assert!(state.account_summary.is_none());
    }

    #[tokio::test]
    async fn test_sign_out_tears_down_session() {
        let manager = seeded_manager().await;
        manager.load(TransactionFilter::new()).await;
        manager.sign_out().await;

        assert!(manager.session().await.is_none());
        assert_eq!(manager.snapshot().await, TransactionState::default());

        assert_eq!(manager.load(TransactionFilter::new()).await, LoadOutcome::Skipped);
        let result = manager
            .add(new_transaction(Income, 5.0, "Tip", "Sales", "2024-01-01"))
            .await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
        assert_eq!(
            manager.snapshot().await.error.as_deref(),
            Some("User not authenticated")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_resolving_after_sign_out_leaves_state_cleared() {
        let manager = seeded_manager().await;
        manager.store().delay_writes(100);

        let (added, ()) = tokio::join!(
            manager.add(new_transaction(Income, 5.0, "Tip", "Sales", "2024-01-01")),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                manager.sign_out().await;
            },
        );

        assert!(added.is_ok());
        assert!(manager.session().await.is_none());
        assert_eq!(manager.snapshot().await, TransactionState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_delete_after_sign_out_records_nothing() {
        let manager = seeded_manager().await;
        manager.load(TransactionFilter::new()).await;
        let victim = manager.snapshot().await.transactions[0].id;
        manager.store().delay_writes(100);
        manager.store().fail_writes.store(true, Ordering::SeqCst);

        let (deleted, ()) = tokio::join!(manager.delete(victim), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            manager.sign_out().await;
        });

        assert!(deleted.is_err());
        assert_eq!(manager.snapshot().await, TransactionState::default());
    }

    #[tokio::test]
    async fn test_manager_over_sql_store() -> Result<()> {
        let (store, session) = setup_test_store().await?;
        let manager = TransactionStateManager::new(store, session, &StateConfig::default());

        manager
            .add(new_transaction(Income, 100.0, "Client payment", "Services", "2024-01-20"))
            .await?;
        manager
            .add(new_transaction(Expense, 40.0, "Supplies", "Supplies", "2024-01-19"))
            .await?;
        assert_eq!(manager.load(TransactionFilter::new()).await, LoadOutcome::Applied);

        let state = manager.snapshot().await;
        assert_eq!(state.summary, FinancialSummary::from_totals(100.0, 40.0));
        assert_eq!(state.account_summary, Some(state.summary));
        assert_eq!(state.transactions[0].description, "Client payment");
        Ok(())
    }
}
