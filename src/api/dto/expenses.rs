/*
 * Responsibility
 * - Expenses の request/response DTO
 * - 入力値の検証 (フィールド単位のエラーを集めて AppError::Validation にする)
 *
 * Notes
 * - body は serde_json::Value のまま受けて検証する
 *   (型不一致も「フィールドのエラー」として返すため)
 * - null が明示された場合は「存在する値」として検証する (= エラー)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, FieldError};
use crate::models::{Category, Expense, ExpenseFilter, ExpensePatch, NewExpense, parse_iso8601};

const AMOUNT_INVALID: &str = "Amount must be a number";
const AMOUNT_REQUIRED: &str = "Amount is required";
const CATEGORY_INVALID: &str = "Category is invalid";
const CATEGORY_REQUIRED: &str = "Category is required";
const DATE_INVALID: &str = "Date must be a valid date";
const DESCRIPTION_INVALID: &str = "Description must be a string";

// Distinguish `"field": null` (Some(Null)) from a missing field (None).
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// `[+-]` digits, optionally with a fractional part. No exponent, no
/// whitespace, no `NaN`/`Infinity`.
fn is_numeric(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
    let (int, frac) = unsigned.split_once('.').unwrap_or(("", unsigned));
    !frac.is_empty()
        && frac.bytes().all(|b| b.is_ascii_digit())
        && int.bytes().all(|b| b.is_ascii_digit())
}

// Long digit strings parse to `inf`; those are not amounts.
fn parse_number(raw: &str) -> Option<f64> {
    if !is_numeric(raw) {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn parse_category(value: &Value) -> Option<Category> {
    value.as_str().and_then(|s| s.parse().ok())
}

fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_iso8601)
}

fn parse_description(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_string())
}

/// Body of `POST /expenses` and `PUT /expenses/{id}`.
///
/// Unknown fields (including any attempt to send `user`) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ExpensePayload {
    #[serde(default, deserialize_with = "present")]
    pub amount: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub date: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Value>,
}

impl ExpensePayload {
    /// Validate every present field. Absent fields stay `None`.
    pub fn into_patch(self) -> Result<ExpensePatch, AppError> {
        let mut errors = Vec::new();

        let amount = check(&mut errors, self.amount.as_ref(), "amount", AMOUNT_INVALID, parse_amount);
        let category = check(
            &mut errors,
            self.category.as_ref(),
            "category",
            CATEGORY_INVALID,
            parse_category,
        );
        let date = check(&mut errors, self.date.as_ref(), "date", DATE_INVALID, parse_date);
        let description = check(
            &mut errors,
            self.description.as_ref(),
            "description",
            DESCRIPTION_INVALID,
            parse_description,
        );

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(ExpensePatch {
            amount,
            category,
            date,
            description,
        })
    }

    /// Same field rules as `into_patch`, plus `amount` and `category` are
    /// required. A missing `date` becomes `now`.
    pub fn into_new_expense(self, owner: Uuid, now: DateTime<Utc>) -> Result<NewExpense, AppError> {
        let mut required = Vec::new();
        if self.amount.is_none() {
            required.push(FieldError::new("amount", AMOUNT_REQUIRED));
        }
        if self.category.is_none() {
            required.push(FieldError::new("category", CATEGORY_REQUIRED));
        }

        let patch = match self.into_patch() {
            Ok(patch) if required.is_empty() => patch,
            Ok(_) => return Err(AppError::Validation(required)),
            Err(AppError::Validation(mut errors)) => {
                required.append(&mut errors);
                return Err(AppError::Validation(required));
            }
            Err(other) => return Err(other),
        };

        // required presence checked above; a present value that failed to parse
        // already returned
        let (Some(amount), Some(category)) = (patch.amount, patch.category) else {
            return Err(AppError::Validation(required));
        };

        Ok(NewExpense {
            user: owner,
            amount,
            category,
            date: patch.date.unwrap_or(now),
            description: patch.description,
        })
    }
}

fn check<T>(
    errors: &mut Vec<FieldError>,
    value: Option<&Value>,
    field: &'static str,
    message: &'static str,
    parse: fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = value?;
    let parsed = parse(value);
    if parsed.is_none() {
        errors.push(FieldError::new(field, message));
    }
    parsed
}

/// Query string of `GET /expenses`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExpensesQuery {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub description: Option<String>,
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
}

impl ListExpensesQuery {
    pub fn into_filter(self, owner: Uuid) -> Result<ExpenseFilter, AppError> {
        let mut errors = Vec::new();
        let mut filter = ExpenseFilter::for_owner(owner);

        filter.category = non_empty(self.category);
        filter.description = non_empty(self.description);

        filter.date_from = non_empty(self.start_date).and_then(|raw| {
            let parsed = parse_iso8601(&raw);
            if parsed.is_none() {
                errors.push(FieldError::new("startDate", "startDate must be a valid date"));
            }
            parsed
        });
        filter.date_to = non_empty(self.end_date).and_then(|raw| {
            let parsed = parse_iso8601(&raw);
            if parsed.is_none() {
                errors.push(FieldError::new("endDate", "endDate must be a valid date"));
            }
            parsed
        });
        filter.min_amount = non_empty(self.min_amount).and_then(|raw| {
            let parsed = parse_number(&raw);
            if parsed.is_none() {
                errors.push(FieldError::new("minAmount", "minAmount must be a number"));
            }
            parsed
        });
        filter.max_amount = non_empty(self.max_amount).and_then(|raw| {
            let parsed = parse_number(&raw);
            if parsed.is_none() {
                errors.push(FieldError::new("maxAmount", "maxAmount must be a number"));
            }
            parsed
        });

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(filter)
    }
}

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub amount: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<Expense> for ExpenseResponse {
    fn from(e: Expense) -> Self {
        Self {
            id: e.id,
            user: e.user,
            amount: e.amount,
            category: e.category,
            date: e.date,
            description: e.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn payload(body: Value) -> ExpensePayload {
        serde_json::from_value(body).unwrap()
    }

    fn fields(err: AppError) -> Vec<&'static str> {
        match err {
            AppError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[rstest]
    #[case("42", true)]
    #[case("42.5", true)]
    #[case("-3.25", true)]
    #[case("+0.5", true)]
    #[case(".5", true)]
    #[case("5.", false)]
    #[case("1e3", false)]
    #[case(" 4", false)]
    #[case("NaN", false)]
    #[case("", false)]
    #[case("12abc", false)]
    fn numeric_strings(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(is_numeric(raw), ok);
    }

    #[rstest]
    #[case(json!({ "amount": "9".repeat(400) }))]
    #[case(json!({ "amount": format!("-{}.5", "9".repeat(400)) }))]
    fn overflowing_amount_is_rejected(#[case] body: Value) {
        let err = payload(body).into_patch().unwrap_err();
        assert_eq!(fields(err), vec!["amount"]);
    }

    #[test]
    fn overflowing_amount_filters_are_rejected() {
        let err = ListExpensesQuery {
            min_amount: Some("9".repeat(400)),
            max_amount: Some("1".repeat(500)),
            ..Default::default()
        }
        .into_filter(Uuid::new_v4())
        .unwrap_err();
        assert_eq!(fields(err), vec!["minAmount", "maxAmount"]);
    }

    #[test]
    fn missing_fields_are_not_touched() {
        let patch = payload(json!({ "amount": 10 })).into_patch().unwrap();
        assert_eq!(patch.amount, Some(10.0));
        assert_eq!(patch.category, None);
        assert_eq!(patch.date, None);
        assert_eq!(patch.description, None);
    }

    #[test]
    fn numeric_string_amount_is_accepted() {
        let patch = payload(json!({ "amount": "19.99" })).into_patch().unwrap();
        assert_eq!(patch.amount, Some(19.99));
    }

    #[rstest]
    #[case(json!({ "amount": "ten" }), "amount")]
    #[case(json!({ "amount": null }), "amount")]
    #[case(json!({ "amount": true }), "amount")]
    #[case(json!({ "category": "Snacks" }), "category")]
    #[case(json!({ "category": "food" }), "category")]
    #[case(json!({ "date": "last tuesday" }), "date")]
    #[case(json!({ "date": 1700000000 }), "date")]
    #[case(json!({ "description": 5 }), "description")]
    #[case(json!({ "description": null }), "description")]
    fn invalid_fields_are_reported(#[case] body: Value, #[case] field: &str) {
        let err = payload(body).into_patch().unwrap_err();
        assert_eq!(fields(err), vec![field]);
    }

    #[test]
    fn every_bad_field_is_reported_at_once() {
        let err = payload(json!({ "amount": "x", "category": "Snacks", "date": "nope" }))
            .into_patch()
            .unwrap_err();
        assert_eq!(fields(err), vec!["amount", "category", "date"]);
    }

    #[test]
    fn description_is_trimmed() {
        let patch = payload(json!({ "description": "  lunch  " })).into_patch().unwrap();
        assert_eq!(patch.description.as_deref(), Some("lunch"));
    }

    #[test]
    fn owner_in_body_is_ignored() {
        let patch = payload(json!({ "user": Uuid::new_v4(), "amount": 1 })).into_patch().unwrap();
        assert_eq!(patch.amount, Some(1.0));
    }

    #[test]
    fn create_requires_amount_and_category() {
        let owner = Uuid::new_v4();
        let err = payload(json!({ "description": "x" }))
            .into_new_expense(owner, Utc::now())
            .unwrap_err();
        assert_eq!(fields(err), vec!["amount", "category"]);

        let err = payload(json!({ "amount": 3, "category": "Snacks" }))
            .into_new_expense(owner, Utc::now())
            .unwrap_err();
        assert_eq!(fields(err), vec!["category"]);
    }

    #[test]
    fn create_defaults_date_to_now() {
        let owner = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let new = payload(json!({ "amount": 42.5, "category": "Food", "description": "lunch" }))
            .into_new_expense(owner, now)
            .unwrap();

        assert_eq!(new.user, owner);
        assert_eq!(new.amount, 42.5);
        assert_eq!(new.category, Category::Food);
        assert_eq!(new.date, now);
        assert_eq!(new.description.as_deref(), Some("lunch"));
    }

    #[test]
    fn query_builds_conjunctive_filter() {
        let owner = Uuid::new_v4();
        let filter = ListExpensesQuery {
            category: Some("Food".into()),
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-01-31T23:59:59Z".into()),
            min_amount: Some("10".into()),
            max_amount: Some("99.5".into()),
            description: Some("lun".into()),
        }
        .into_filter(owner)
        .unwrap();

        assert_eq!(filter.owner, owner);
        assert_eq!(filter.category.as_deref(), Some("Food"));
        assert_eq!(filter.date_from, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(filter.date_to, Some(Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()));
        assert_eq!(filter.min_amount, Some(10.0));
        assert_eq!(filter.max_amount, Some(99.5));
        assert_eq!(filter.description.as_deref(), Some("lun"));
    }

    #[test]
    fn empty_query_values_are_ignored() {
        let owner = Uuid::new_v4();
        let filter = ListExpensesQuery {
            category: Some(String::new()),
            min_amount: Some(String::new()),
            ..Default::default()
        }
        .into_filter(owner)
        .unwrap();
        assert_eq!(filter, ExpenseFilter::for_owner(owner));
    }

    #[test]
    fn unparseable_query_values_are_rejected() {
        let err = ListExpensesQuery {
            start_date: Some("soon".into()),
            max_amount: Some("lots".into()),
            ..Default::default()
        }
        .into_filter(Uuid::new_v4())
        .unwrap_err();
        assert_eq!(fields(err), vec!["startDate", "maxAmount"]);
    }
}
