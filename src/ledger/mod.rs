mod error;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

use crate::models::{Category, Expense, ExpenseDraft, MonthKey};

pub use error::LedgerError;

// ── Mutation ──────────────────────────────────────────────────

/// Validate `draft`, assign it a fresh id and append it.
pub(crate) fn add_expense(
    expenses: &mut Vec<Expense>,
    draft: ExpenseDraft,
) -> Result<Expense, LedgerError> {
    add_expense_at(expenses, draft, chrono::Utc::now().timestamp_millis())
}

/// Same as [`add_expense`] with an explicit creation timestamp in
/// milliseconds, which seeds the id.
pub(crate) fn add_expense_at(
    expenses: &mut Vec<Expense>,
    draft: ExpenseDraft,
    now_millis: i64,
) -> Result<Expense, LedgerError> {
    let expense = Expense::new(next_id(expenses, now_millis), draft)?;
    expenses.push(expense.clone());
    Ok(expense)
}

/// Timestamp-based id, bumped past the largest existing id so two records
/// created within the same millisecond never collide.
fn next_id(expenses: &[Expense], now_millis: i64) -> i64 {
    match expenses.iter().map(|e| e.id).max() {
        Some(max) if max >= now_millis => max.saturating_add(1),
        _ => now_millis,
    }
}

/// Replace every field except `id` of the record with that id.
pub(crate) fn update_expense(
    expenses: &mut [Expense],
    id: i64,
    draft: ExpenseDraft,
) -> Result<Expense, LedgerError> {
    let slot = expenses
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or(LedgerError::NotFound(id))?;
    let updated = Expense::from_draft(id, draft)?;
    *slot = updated.clone();
    Ok(updated)
}

/// Remove the record with `id`. Idempotent; returns whether anything was
/// removed.
pub(crate) fn delete_expense(expenses: &mut Vec<Expense>, id: i64) -> bool {
    let before = expenses.len();
    expenses.retain(|e| e.id != id);
    expenses.len() != before
}

pub(crate) fn find_expense(expenses: &[Expense], id: i64) -> Option<&Expense> {
    expenses.iter().find(|e| e.id == id)
}

// ── Totals & budget ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Totals {
    pub(crate) total: Decimal,
    /// `budget - total`; negative once over budget.
    pub(crate) remaining: Decimal,
    pub(crate) count: usize,
}

pub(crate) fn compute_totals(expenses: &[Expense], budget: Decimal) -> Totals {
    let total: Decimal = expenses.iter().map(|e| e.amount).sum();
    Totals {
        total,
        remaining: budget - total,
        count: expenses.len(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BudgetStatus {
    /// No budget set (zero or less).
    Unset,
    /// Within budget, carrying the rounded percentage used.
    Within(u32),
    /// Over budget by the carried amount.
    Over(Decimal),
}

pub(crate) fn budget_status(total: Decimal, budget: Decimal) -> BudgetStatus {
    if budget <= Decimal::ZERO {
        return BudgetStatus::Unset;
    }
    if total > budget {
        return BudgetStatus::Over(total - budget);
    }
    let percent = total
        .checked_div(budget)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|p| p.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|p| p.to_u32())
        .unwrap_or(0);
    BudgetStatus::Within(percent)
}

// ── Aggregation ───────────────────────────────────────────────

/// Sum per category. Only categories with at least one record appear.
pub(crate) fn aggregate_by_category(expenses: &[Expense]) -> BTreeMap<Category, Decimal> {
    let mut totals = BTreeMap::new();
    for e in expenses {
        *totals.entry(e.category).or_insert(Decimal::ZERO) += e.amount;
    }
    totals
}

/// Sum per calendar month, oldest month first.
pub(crate) fn aggregate_by_month(expenses: &[Expense]) -> Vec<(MonthKey, Decimal)> {
    let mut totals: BTreeMap<MonthKey, Decimal> = BTreeMap::new();
    for e in expenses {
        *totals.entry(MonthKey::of(e.date)).or_insert(Decimal::ZERO) += e.amount;
    }
    totals.into_iter().collect()
}

// ── Filtering & ordering ──────────────────────────────────────

/// Category and month constraints, combined with AND. `None` matches all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ExpenseFilter {
    pub(crate) category: Option<Category>,
    pub(crate) month: Option<MonthKey>,
}

impl ExpenseFilter {
    /// Parse raw filter inputs. `"All"` or blank means no category
    /// constraint; blank means no month constraint.
    pub(crate) fn parse(category: &str, month: &str) -> Result<Self, LedgerError> {
        let category = match category.trim() {
            "" => None,
            c if c.eq_ignore_ascii_case("all") => None,
            c => Some(
                Category::parse(c)
                    .ok_or_else(|| LedgerError::invalid("category", format!("unknown category '{c}'")))?,
            ),
        };
        let month = if month.trim().is_empty() {
            None
        } else {
            Some(MonthKey::parse(month)?)
        };
        Ok(Self { category, month })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.category.is_none() && self.month.is_none()
    }

    pub(crate) fn matches(&self, expense: &Expense) -> bool {
        self.category.is_none_or(|c| expense.category == c)
            && self.month.is_none_or(|m| m.contains(expense.date))
    }
}

pub(crate) fn filter(expenses: &[Expense], filter: &ExpenseFilter) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

/// Most recent first. The sort is stable, so equal dates keep their order.
pub(crate) fn sort_by_date_descending(expenses: &[Expense]) -> Vec<Expense> {
    let mut sorted = expenses.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}
