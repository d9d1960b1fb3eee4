/*
 * Responsibility
 * - Expense レコードのドメイン型
 * - 作成用 (NewExpense) / 部分更新用 (ExpensePatch) の値
 * - owner (user) は作成時に決まり、以降は変更されない
 */
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub user: Uuid,
    pub amount: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub user: Uuid,
    pub amount: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
}

/// Fields to overwrite on an existing record. `None` means "leave as is".
///
/// Ownership is fixed at creation, so there is no owner field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }

    pub fn apply(&self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(description) = &self.description {
            expense.description = Some(description.clone());
        }
    }
}

impl NewExpense {
    pub fn into_expense(self, id: Uuid) -> Expense {
        Expense {
            id,
            user: self.user,
            amount: self.amount,
            category: self.category,
            date: self.date,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Expense {
        Expense {
            id: Uuid::new_v4(),
            user: Uuid::new_v4(),
            amount: 12.0,
            category: Category::Food,
            date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            description: Some("groceries".into()),
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut e = sample();
        let before = e.clone();
        let patch = ExpensePatch::default();
        assert!(patch.is_empty());
        patch.apply(&mut e);
        assert_eq!(e, before);
    }

    #[test]
    fn patch_touches_only_present_fields() {
        let mut e = sample();
        let before = e.clone();
        ExpensePatch {
            amount: Some(99.5),
            ..Default::default()
        }
        .apply(&mut e);

        assert_eq!(e.amount, 99.5);
        assert_eq!(e.category, before.category);
        assert_eq!(e.date, before.date);
        assert_eq!(e.description, before.description);
        assert_eq!(e.user, before.user);
        assert_eq!(e.id, before.id);
    }
}
