use rust_decimal::Decimal;

use super::Expense;

const DEMO_USER: &str = "demo";

/// Partition key for a ledger. The demo scope is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    User(String),
    Demo,
}

impl Scope {
    /// Scope for a user key. Keys are opaque; only `--demo` reaches the demo scope.
    pub fn user(name: &str) -> Self {
        Self::User(name.to_string())
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo)
    }

    pub fn expenses_key(&self) -> Option<String> {
        match self {
            Self::User(name) => Some(format!("expenses_{name}")),
            Self::Demo => None,
        }
    }

    pub fn budget_key(&self) -> Option<String> {
        match self {
            Self::User(name) => Some(format!("budget_{name}")),
            Self::Demo => None,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(name) => write!(f, "{name}"),
            Self::Demo => write!(f, "{DEMO_USER}"),
        }
    }
}

/// Every expense plus the budget for one scope. Loaded and replaced together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub expenses: Vec<Expense>,
    pub budget: Decimal,
}
