use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Category;
use crate::ledger::LedgerError;

/// Largest amount a single expense or budget may carry (one trillion).
/// Keeps running totals far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Reject amounts that are negative or above [`MAX_AMOUNT`].
pub(crate) fn check_amount(field: &'static str, amount: Decimal) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::invalid(field, "must not be negative"));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::invalid(field, format!("must not exceed {MAX_AMOUNT}")));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
}

impl Expense {
    /// Smart constructor for freshly created records: the amount must be
    /// strictly positive on creation.
    pub fn new(id: i64, draft: ExpenseDraft) -> Result<Self, LedgerError> {
        let expense = Self::from_draft(id, draft)?;
        if expense.amount.is_zero() {
            return Err(LedgerError::invalid("amount", "must be greater than zero"));
        }
        Ok(expense)
    }

    /// Validates a draft without the creation-only positivity rule. Edits may
    /// bring an amount down to zero.
    pub(crate) fn from_draft(id: i64, draft: ExpenseDraft) -> Result<Self, LedgerError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::missing("name"));
        }
        let amount = draft.amount.ok_or_else(|| LedgerError::missing("amount"))?;
        check_amount("amount", amount)?;
        let category = draft
            .category
            .ok_or_else(|| LedgerError::missing("category"))?;
        let date = draft.date.ok_or_else(|| LedgerError::missing("date"))?;

        Ok(Self {
            id,
            name,
            amount,
            category,
            date,
            is_recurring: draft.is_recurring,
        })
    }
}

/// Candidate field values for an add or an edit, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    pub name: String,
    pub amount: Option<Decimal>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
    pub is_recurring: bool,
}

impl ExpenseDraft {
    #[cfg(test)]
    pub fn new(name: &str, amount: Decimal, category: Category, date: NaiveDate) -> Self {
        Self {
            name: name.to_string(),
            amount: Some(amount),
            category: Some(category),
            date: Some(date),
            is_recurring: false,
        }
    }

    #[cfg(test)]
    pub fn recurring(mut self, is_recurring: bool) -> Self {
        self.is_recurring = is_recurring;
        self
    }

    /// Build a draft from raw form text. Blank fields stay `None` so the
    /// ledger reports them as missing; text that is present but unreadable
    /// is rejected here.
    pub fn parse(
        name: &str,
        amount: &str,
        category: &str,
        date: &str,
        is_recurring: bool,
    ) -> Result<Self, LedgerError> {
        let amount = if amount.trim().is_empty() {
            None
        } else {
            Some(crate::util::parse_amount(amount)?)
        };
        let category = if category.trim().is_empty() {
            None
        } else {
            Some(Category::parse(category).ok_or_else(|| {
                LedgerError::invalid("category", format!("unknown category '{}'", category.trim()))
            })?)
        };
        let date = if date.trim().is_empty() {
            None
        } else {
            Some(crate::util::parse_date(date)?)
        };

        Ok(Self {
            name: name.trim().to_string(),
            amount,
            category,
            date,
            is_recurring,
        })
    }
}
