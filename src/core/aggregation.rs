//! Transaction aggregation for dashboards and charts.
//!
//! Pure functions over a slice of transaction records: totals, net profit, a monthly
//! income/expense series, a category breakdown, a profit trend, and the single-number
//! analytics figures. Nothing here touches the store or keeps state, so every function can
//! be exercised directly on literal records.

use crate::{
    entities::transaction,
    models::{FinancialSummary, TransactionType},
};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// First day of the month this bucket covers
    pub month_start: NaiveDate,
    /// Chart label, e.g. `Jan 2024`
    pub label: String,
    /// Income recorded in the month
    pub income: f64,
    /// Expenses recorded in the month
    pub expenses: f64,
}

impl MonthlyTotals {
    /// `income - expenses` for the month.
    #[must_use]
    pub fn profit(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Summed amount for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// Category name
    pub category: String,
    /// Sum of amounts recorded under the category
    pub total: f64,
}

/// Net profit for one month of the trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitPoint {
    /// Chart label, same as the matching [`MonthlyTotals::label`]
    pub label: String,
    /// `income - expenses` for the month
    pub profit: f64,
}

/// Sum of amounts for one transaction type.
#[must_use]
pub fn total_for(transactions: &[transaction::Model], kind: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Total income, total expenses and net profit for the list.
///
/// An empty list yields all zeros.
#[must_use]
pub fn summarize(transactions: &[transaction::Model]) -> FinancialSummary {
    let (income, expenses) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expenses), t| match t.kind {
                TransactionType::Income => (income + t.amount, expenses),
                TransactionType::Expense => (income, expenses + t.amount),
            });
    FinancialSummary::from_totals(income, expenses)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Buckets transactions by calendar month, oldest month first.
///
/// Months with no transactions are not emitted.
#[must_use]
pub fn monthly_series(transactions: &[transaction::Model]) -> Vec<MonthlyTotals> {
    let mut buckets: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for t in transactions {
        let entry = buckets.entry(month_start(t.date)).or_insert((0.0, 0.0));
        match t.kind {
            TransactionType::Income => entry.0 += t.amount,
            TransactionType::Expense => entry.1 += t.amount,
        }
    }

    buckets
        .into_iter()
        .map(|(start, (income, expenses))| MonthlyTotals {
            month_start: start,
            label: start.format("%b %Y").to_string(),
            income,
            expenses,
        })
        .collect()
}

/// Per-month profit in the same order as [`monthly_series`].
#[must_use]
pub fn profit_trend(transactions: &[transaction::Model]) -> Vec<ProfitPoint> {
    monthly_series(transactions)
        .into_iter()
        .map(|m| ProfitPoint {
            profit: m.profit(),
            label: m.label,
        })
        .collect()
}

fn sum_by_category<'a>(
    transactions: impl Iterator<Item = &'a transaction::Model>,
) -> Vec<CategoryTotal> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for t in transactions {
        if let Some(&index) = positions.get(t.category.as_str()) {
            totals[index].total += t.amount;
        } else {
            positions.insert(t.category.as_str(), totals.len());
            totals.push(CategoryTotal {
                category: t.category.clone(),
                total: t.amount,
            });
        }
    }

    totals
}

/// Sums amounts per category across both income and expenses, in first-seen order.
///
/// The breakdown mixes income and expense magnitudes on purpose so that its sum equals
/// `total_income + total_expenses`. Use [`category_totals_for`] for a single type.
#[must_use]
pub fn category_totals(transactions: &[transaction::Model]) -> Vec<CategoryTotal> {
    sum_by_category(transactions.iter())
}

/// Sums amounts per category for one transaction type, in first-seen order.
#[must_use]
pub fn category_totals_for(
    transactions: &[transaction::Model],
    kind: TransactionType,
) -> Vec<CategoryTotal> {
    sum_by_category(transactions.iter().filter(|t| t.kind == kind))
}

/// Number of transactions in the list.
#[must_use]
pub const fn transaction_count(transactions: &[transaction::Model]) -> usize {
    transactions.len()
}

/// Mean amount across all transactions, or 0 for an empty list.
#[must_use]
pub fn average_transaction(transactions: &[transaction::Model]) -> f64 {
    if transactions.is_empty() {
        return 0.0;
    }
    let sum: f64 = transactions.iter().map(|t| t.amount).sum();
    // Cast safety: transaction lists are far below 2^52 entries.
    #[allow(clippy::cast_precision_loss)]
    let count = transactions.len() as f64;
    sum / count
}

/// Largest single amount, or 0 for an empty list.
#[must_use]
pub fn largest_transaction(transactions: &[transaction::Model]) -> f64 {
    transactions
        .iter()
        .map(|t| t.amount)
        .fold(0.0, f64::max)
}

/// Net profit as a percentage of income, or 0 when there is no income.
#[must_use]
pub fn profit_margin(summary: &FinancialSummary) -> f64 {
    if summary.total_income > 0.0 {
        (summary.net_profit / summary.total_income) * 100.0
    } else {
        0.0
    }
}

/// The first `limit` transactions of the list (newest first when the list is date-descending).
#[must_use]
pub fn recent(transactions: &[transaction::Model], limit: usize) -> &[transaction::Model] {
    &transactions[..limit.min(transactions.len())]
}
