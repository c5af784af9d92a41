mod schema;
mod sqlite;
mod storage;

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::ledger::{self, LedgerError};
use crate::models::{check_amount, Expense, ExpenseDraft, Ledger, Scope};

pub(crate) use sqlite::SqliteStorage;
pub(crate) use storage::{KeyValueStorage, MemoryStorage, PersistenceError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

// ── Load / persist ────────────────────────────────────────────

/// Read the ledger for `scope`. Absent or malformed payloads load as an
/// empty collection and a zero budget. The demo scope never reads storage.
pub(crate) fn load<S: KeyValueStorage + ?Sized>(
    storage: &S,
    scope: &Scope,
) -> Result<Ledger, PersistenceError> {
    let (Some(expenses_key), Some(budget_key)) = (scope.expenses_key(), scope.budget_key())
    else {
        return Ok(Ledger::default());
    };

    let expenses = match storage.get(&expenses_key)? {
        Some(raw) => decode_expenses(&expenses_key, &raw),
        None => Vec::new(),
    };
    let budget = match storage.get(&budget_key)? {
        Some(raw) => decode_budget(&budget_key, &raw),
        None => Decimal::ZERO,
    };

    debug!(%scope, count = expenses.len(), %budget, "loaded ledger");
    Ok(Ledger { expenses, budget })
}

fn decode_expenses(key: &str, raw: &str) -> Vec<Expense> {
    match serde_json::from_str::<Option<Vec<Expense>>>(raw) {
        Ok(expenses) => expenses
            .unwrap_or_default()
            .into_iter()
            .filter(|e| match check_amount("amount", e.amount) {
                Ok(()) => true,
                Err(err) => {
                    warn!(key, id = e.id, error = %err, "skipping stored expense");
                    false
                }
            })
            .collect(),
        Err(e) => {
            warn!(key, error = %e, "ignoring malformed expense payload");
            Vec::new()
        }
    }
}

fn decode_budget(key: &str, raw: &str) -> Decimal {
    match Decimal::from_str(raw.trim()) {
        Ok(budget) if check_amount("budget", budget).is_ok() => budget,
        _ => {
            warn!(key, raw, "ignoring malformed budget payload");
            Decimal::ZERO
        }
    }
}

/// Write the full collection. No-op for the demo scope.
pub(crate) fn persist_expenses<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    scope: &Scope,
    expenses: &[Expense],
) -> Result<(), PersistenceError> {
    let Some(key) = scope.expenses_key() else {
        return Ok(());
    };
    let payload = serde_json::to_string(expenses).map_err(|source| PersistenceError::Encode {
        key: key.clone(),
        source,
    })?;
    storage.set(&key, &payload)?;
    debug!(%scope, count = expenses.len(), "persisted expenses");
    Ok(())
}

/// Write the budget scalar. No-op for the demo scope.
pub(crate) fn persist_budget<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    scope: &Scope,
    budget: Decimal,
) -> Result<(), PersistenceError> {
    let Some(key) = scope.budget_key() else {
        return Ok(());
    };
    storage.set(&key, &budget.to_string())?;
    debug!(%scope, %budget, "persisted budget");
    Ok(())
}

// ── Expense store ─────────────────────────────────────────────

/// The canonical in-memory ledger for the active scope. Every mutator is a
/// single `&mut self` read-modify-write: the change is applied in memory
/// first, then persisted. A persistence failure is returned but the
/// in-memory state keeps the change.
pub(crate) struct ExpenseStore<S: KeyValueStorage> {
    storage: S,
    scope: Scope,
    ledger: Ledger,
}

impl<S: KeyValueStorage> ExpenseStore<S> {
    pub(crate) fn open(storage: S, scope: Scope) -> Result<Self, PersistenceError> {
        let ledger = load(&storage, &scope)?;
        Ok(Self {
            storage,
            scope,
            ledger,
        })
    }

    pub(crate) fn scope(&self) -> &Scope {
        &self.scope
    }

    pub(crate) fn expenses(&self) -> &[Expense] {
        &self.ledger.expenses
    }

    pub(crate) fn budget(&self) -> Decimal {
        self.ledger.budget
    }

    pub(crate) fn add(&mut self, draft: ExpenseDraft) -> Result<Expense, StoreError> {
        let expense = ledger::add_expense(&mut self.ledger.expenses, draft)?;
        self.save_expenses()?;
        Ok(expense)
    }

    pub(crate) fn update(&mut self, id: i64, draft: ExpenseDraft) -> Result<Expense, StoreError> {
        let expense = ledger::update_expense(&mut self.ledger.expenses, id, draft)?;
        self.save_expenses()?;
        Ok(expense)
    }

    /// Returns whether a record was removed. Persists either way.
    pub(crate) fn delete(&mut self, id: i64) -> Result<bool, StoreError> {
        let removed = ledger::delete_expense(&mut self.ledger.expenses, id);
        self.save_expenses()?;
        Ok(removed)
    }

    pub(crate) fn set_budget(&mut self, budget: Decimal) -> Result<(), StoreError> {
        check_amount("budget", budget)?;
        self.ledger.budget = budget;
        persist_budget(&mut self.storage, &self.scope, budget)?;
        Ok(())
    }

    /// Forget every expense and the budget for this scope, in memory and in
    /// storage.
    pub(crate) fn clear(&mut self) -> Result<(), StoreError> {
        self.ledger = Ledger::default();
        if let (Some(expenses_key), Some(budget_key)) =
            (self.scope.expenses_key(), self.scope.budget_key())
        {
            self.storage.remove(&expenses_key)?;
            self.storage.remove(&budget_key)?;
        }
        Ok(())
    }

    fn save_expenses(&mut self) -> Result<(), PersistenceError> {
        persist_expenses(&mut self.storage, &self.scope, &self.ledger.expenses).inspect_err(|e| {
            warn!(scope = %self.scope, error = %e, "keeping unsaved changes in memory");
        })
    }

    #[cfg(test)]
    pub(crate) fn into_storage(self) -> S {
        self.storage
    }
}
