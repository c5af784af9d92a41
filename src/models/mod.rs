mod category;
mod expense;
mod month;
mod scope;

pub use category::Category;
pub(crate) use expense::check_amount;
pub use expense::{Expense, ExpenseDraft, MAX_AMOUNT};
pub use month::MonthKey;
pub use scope::{Ledger, Scope};
