//! List filter for expenses.
//!
//! Every present criterion narrows the result (AND semantics). The owner
//! criterion is always present, so a filter can never reach another user's
//! records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Expense;

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFilter {
    pub owner: Uuid,
    /// Exact match against the stored category name. Not checked against the
    /// closed set: an unknown name just matches nothing.
    pub category: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    /// Case-insensitive substring of the description.
    pub description: Option<String>,
}

impl ExpenseFilter {
    pub fn for_owner(owner: Uuid) -> Self {
        Self {
            owner,
            category: None,
            date_from: None,
            date_to: None,
            min_amount: None,
            max_amount: None,
            description: None,
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if expense.user != self.owner {
            return false;
        }
        if let Some(category) = &self.category
            && expense.category.as_str() != category
        {
            return false;
        }
        if self.date_from.is_some_and(|from| expense.date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| expense.date > to) {
            return false;
        }
        if self.min_amount.is_some_and(|min| expense.amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| expense.amount > max) {
            return false;
        }
        if let Some(needle) = &self.description {
            let Some(text) = &expense.description else {
                return false;
            };
            if !text.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}
