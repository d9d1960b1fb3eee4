mod category;
mod datetime;
mod expense;
mod filter;

pub use category::{Category, UnknownCategory};
pub use datetime::parse_iso8601;
pub use expense::{Expense, ExpensePatch, NewExpense};
pub use filter::ExpenseFilter;
