//! Report generation business logic.
//!
//! This module builds the dashboard and analytics views from a transaction list and formats
//! amounts for display. Report builders are pure over a slice; the `generate_*` functions
//! fetch the account's full list from a store first.

use crate::{
    core::{
        aggregation::{self, CategoryTotal, MonthlyTotals, ProfitPoint},
        filter::TransactionFilter,
        store::TransactionStore,
    },
    entities::transaction,
    errors::Result,
    models::{FinancialSummary, Session, TransactionType},
};
use serde::Serialize;
use std::fmt::Write as _;

/// Transactions shown on the dashboard
pub const RECENT_LIMIT: usize = 5;

/// Headline numbers and latest activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// Totals over the reported list
    pub summary: FinancialSummary,
    /// Net profit as a percentage of income
    pub profit_margin: f64,
    /// Newest transactions, at most [`RECENT_LIMIT`]
    pub recent_transactions: Vec<transaction::Model>,
}

/// Everything the analytics screen charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    /// Totals over the reported list
    pub summary: FinancialSummary,
    /// Mean transaction amount
    pub average_transaction: f64,
    /// Number of transactions
    pub transaction_count: usize,
    /// Largest single amount
    pub largest_transaction: f64,
    /// Income and expenses per month, oldest first
    pub monthly: Vec<MonthlyTotals>,
    /// Amount per category, income and expenses together
    pub categories: Vec<CategoryTotal>,
    /// Profit per month
    pub profit_trend: Vec<ProfitPoint>,
}

/// Builds the dashboard from a date-descending list.
#[must_use]
pub fn dashboard_report(transactions: &[transaction::Model]) -> DashboardReport {
    let summary = aggregation::summarize(transactions);
    DashboardReport {
        summary,
        profit_margin: aggregation::profit_margin(&summary),
        recent_transactions: aggregation::recent(transactions, RECENT_LIMIT).to_vec(),
    }
}

/// Builds the analytics view.
#[must_use]
pub fn analytics_report(transactions: &[transaction::Model]) -> AnalyticsReport {
    AnalyticsReport {
        summary: aggregation::summarize(transactions),
        average_transaction: aggregation::average_transaction(transactions),
        transaction_count: aggregation::transaction_count(transactions),
        largest_transaction: aggregation::largest_transaction(transactions),
        monthly: aggregation::monthly_series(transactions),
        categories: aggregation::category_totals(transactions),
        profit_trend: aggregation::profit_trend(transactions),
    }
}

/// Fetches every transaction for the session and builds the dashboard.
pub async fn generate_dashboard_report<S: TransactionStore>(
    store: &S,
    session: &Session,
) -> Result<DashboardReport> {
    let transactions = store.list(session, &TransactionFilter::new()).await?;
    Ok(dashboard_report(&transactions))
}

/// Fetches every transaction for the session and builds the analytics view.
pub async fn generate_analytics_report<S: TransactionStore>(
    store: &S,
    session: &Session,
) -> Result<AnalyticsReport> {
    let transactions = store.list(session, &TransactionFilter::new()).await?;
    Ok(analytics_report(&transactions))
}

fn group_thousands(value: i64) -> String {
    let digits: Vec<char> = value.unsigned_abs().to_string().chars().rev().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }
    if value < 0 {
        grouped.push('-');
    }
    grouped.chars().rev().collect()
}

/// Formats an amount as whole currency units with thousands separators.
///
/// # Examples
/// `format_currency(1_234_567.8, "KSh")` gives `KSh 1,234,568`.
#[must_use]
pub fn format_currency(amount: f64, label: &str) -> String {
    // Cast safety: display amounts are far inside i64 range; NaN maps to 0.
    #[allow(clippy::cast_possible_truncation)]
    let rounded = amount.round() as i64;
    format!("{label} {}", group_thousands(rounded))
}

/// Formats a transaction amount with a sign for its direction.
///
/// Returns a string like `+KSh 2,500` for income or `-KSh 150` for an expense.
#[must_use]
pub fn format_transaction_amount(transaction: &transaction::Model, label: &str) -> String {
    let sign = match transaction.kind {
        TransactionType::Income => '+',
        TransactionType::Expense => '-',
    };
    format!("{sign}{}", format_currency(transaction.amount, label))
}

/// Generates a summary line for a transaction.
#[must_use]
pub fn format_transaction_summary(transaction: &transaction::Model, label: &str) -> String {
    let amount_str = format_transaction_amount(transaction, label);
    let kind = transaction.kind;
    let category = &transaction.category;
    let desc = &transaction.description;

    format!("{amount_str} | {kind} | {category} | {desc}")
}

/// Renders the dashboard as plain text.
#[must_use]
pub fn render_dashboard(business_name: &str, report: &DashboardReport, label: &str) -> String {
    let summary = &report.summary;
    let mut out = String::new();
    let _ = writeln!(out, "{business_name}");
    let _ = writeln!(out, "Income:     {}", format_currency(summary.total_income, label));
    let _ = writeln!(out, "Expenses:   {}", format_currency(summary.total_expenses, label));
    let _ = writeln!(out, "Net profit: {}", format_currency(summary.net_profit, label));
    let _ = writeln!(out, "Margin:     {:.1}%", report.profit_margin);

    if report.recent_transactions.is_empty() {
        out.push_str("No transactions yet\n");
    } else {
        out.push_str("Recent:\n");
        for t in &report.recent_transactions {
            let _ = writeln!(out, "  {}  {}", t.date, format_transaction_summary(t, label));
        }
    }
    out
}

/// Renders the analytics view as plain text.
#[must_use]
pub fn render_analytics(report: &AnalyticsReport, label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} transactions, average {}, largest {}",
        report.transaction_count,
        format_currency(report.average_transaction, label),
        format_currency(report.largest_transaction, label),
    );

    out.push_str("Monthly:\n");
    for m in &report.monthly {
        let _ = writeln!(
            out,
            "  {}: income {}, expenses {}, profit {}",
            m.label,
            format_currency(m.income, label),
            format_currency(m.expenses, label),
            format_currency(m.profit(), label),
        );
    }

    out.push_str("By category:\n");
    for c in &report.categories {
        let _ = writeln!(out, "  {}: {}", c.category, format_currency(c.total, label));
    }
    out
}
