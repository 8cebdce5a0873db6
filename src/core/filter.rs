//! Transaction filtering.
//!
//! A [`TransactionFilter`] is a conjunction of optional predicates: type, category,
//! ASCII case-insensitive description search, and an inclusive date range. The same filter is
//! applied in two places, client-side over an already-loaded slice ([`TransactionFilter::apply`])
//! and server-side as a query condition ([`TransactionFilter::to_condition`]). Both must
//! select the same records.

use crate::{
    entities::transaction,
    errors::Result,
    models::TransactionType,
};
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Func, LikeExpr},
};
use serde::{Deserialize, Serialize};

/// Selection value meaning "no constraint" in type and category pickers.
pub const ALL: &str = "all";

const LIKE_ESCAPE: char = '\\';

fn is_all(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(ALL)
}

/// Criteria for narrowing a transaction list. Every present field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Exact transaction type
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    /// Exact category name; `"all"` imposes no constraint
    pub category: Option<String>,
    /// Case-insensitive substring of the description; blank imposes no constraint
    pub search: Option<String>,
    /// Inclusive lower date bound
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    /// A filter that matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from picker selections, where `"all"` and blank values mean
    /// "no constraint".
    ///
    /// # Errors
    /// Returns a validation error when `kind` is neither `"all"` nor a known type.
    pub fn from_selections(kind: &str, category: &str, search: &str) -> Result<Self> {
        let kind = if is_all(kind) || kind.trim().is_empty() {
            None
        } else {
            Some(kind.parse()?)
        };
        Ok(Self::new()
            .with_kind(kind)
            .with_category(category)
            .with_search(search))
    }

    /// Restricts to one transaction type (or lifts the restriction with `None`).
    #[must_use]
    pub fn with_kind(mut self, kind: Option<TransactionType>) -> Self {
        self.kind = kind;
        self
    }

    /// Restricts to one category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts to descriptions containing `search`, ignoring case.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restricts to an inclusive date range; either bound may be open.
    #[must_use]
    pub fn with_date_range(
        mut self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    /// Category constraint after discarding blank and `"all"` values.
    #[must_use]
    pub fn active_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.trim().is_empty() && !is_all(c))
    }

    /// Search term after trimming, with ASCII letters lowercased; blank values are discarded.
    ///
    /// Only ASCII is folded because `SQLite`'s `LOWER` folds nothing else.
    #[must_use]
    pub fn active_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_ascii_lowercase)
    }

    /// True when no predicate would constrain anything.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.kind.is_none()
            && self.active_category().is_none()
            && self.active_search().is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Checks one record against every active predicate.
    #[must_use]
    pub fn matches(&self, record: &transaction::Model) -> bool {
        if self.kind.is_some_and(|kind| record.kind != kind) {
            return false;
        }
        if self
            .active_category()
            .is_some_and(|category| record.category != category)
        {
            return false;
        }
        if self
            .active_search()
            .is_some_and(|term| !record.description.to_ascii_lowercase().contains(&term))
        {
            return false;
        }
        if self.start_date.is_some_and(|start| record.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| record.date > end) {
            return false;
        }
        true
    }

    /// Client-side filtering: the matching records, in their original order.
    #[must_use]
    pub fn apply(&self, records: &[transaction::Model]) -> Vec<transaction::Model> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }

    /// Server-side filtering: the same predicates as a query condition on the
    /// `transactions` table.
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(kind) = self.kind {
            condition = condition.add(transaction::Column::Kind.eq(kind));
        }
        if let Some(category) = self.active_category() {
            condition = condition.add(transaction::Column::Category.eq(category));
        }
        if let Some(term) = self.active_search() {
            let pattern = format!("%{}%", escape_like(&term));
            condition = condition.add(
                Expr::expr(Func::lower(Expr::col(transaction::Column::Description)))
                    .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
            );
        }
        if let Some(start) = self.start_date {
            condition = condition.add(transaction::Column::Date.gte(start));
        }
        if let Some(end) = self.end_date {
            condition = condition.add(transaction::Column::Date.lte(end));
        }

        condition
    }
}

/// Escapes `LIKE` wildcards so the search term is matched literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
