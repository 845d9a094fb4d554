//! Expense record entities and aggregation value objects

use serde::{Deserialize, Serialize};

/// A stored expense record.
///
/// The id is assigned by the store on insert and never changes. Every
/// other field is free-form: extraction may produce empty strings or a
/// zero amount and the store accepts them as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub id: i64,
    pub date_time: String,
    pub item_name: String,
    pub amount: f64,
    pub currency: String,
    pub category: String,
}

impl ExpenseRecord {
    /// Rebuild a record from stored fields
    pub fn from_stored(id: i64, draft: ExpenseDraft) -> Self {
        Self {
            id,
            date_time: draft.date_time,
            item_name: draft.item_name,
            amount: draft.amount,
            currency: draft.currency,
            category: draft.category,
        }
    }
}

/// An expense record before the store has assigned it an id.
///
/// This is what the extraction client produces and what `insert`
/// consumes. `Default` is the all-empty/zero fallback draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseDraft {
    pub date_time: String,
    pub item_name: String,
    pub amount: f64,
    pub currency: String,
    pub category: String,
}

impl ExpenseDraft {
    pub fn new(
        date_time: impl Into<String>,
        item_name: impl Into<String>,
        amount: f64,
        currency: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date_time: date_time.into(),
            item_name: item_name.into(),
            amount,
            currency: currency.into(),
            category: category.into(),
        }
    }
}

/// Per-category slice of the aggregation result
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    /// 100 * total / grand_total, or 0 when the grand total is 0
    pub percent: f64,
}

/// Result of `aggregate()`: the grand total plus one entry per
/// distinct category string (empty string is its own group).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSummary {
    pub grand_total: f64,
    pub categories: Vec<CategoryTotal>,
}

impl LedgerSummary {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_draft_is_all_empty() {
        let draft = ExpenseDraft::default();
        assert_eq!(draft.date_time, "");
        assert_eq!(draft.item_name, "");
        assert_eq!(draft.amount, 0.0);
        assert_eq!(draft.currency, "");
        assert_eq!(draft.category, "");
    }

    #[test]
    fn from_stored_carries_every_field() {
        let draft = ExpenseDraft::new("2024-01-01 12:00:00", "lunch", 1200.0, "JPY", "food");
        let record = ExpenseRecord::from_stored(7, draft.clone());
        assert_eq!(record.id, 7);
        assert_eq!(record.date_time, draft.date_time);
        assert_eq!(record.item_name, draft.item_name);
        assert_eq!(record.amount, draft.amount);
        assert_eq!(record.currency, draft.currency);
        assert_eq!(record.category, draft.category);
    }

    #[test]
    fn draft_deserializes_from_camel_case_json() {
        let json = r#"{
            "dateTime": "2024-01-01 12:00:00",
            "itemName": "lunch",
            "amount": 1200,
            "currency": "JPY",
            "category": "food"
        }"#;
        let draft: ExpenseDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.item_name, "lunch");
        assert_eq!(draft.amount, 1200.0);
    }

    #[test]
    fn empty_summary() {
        let summary = LedgerSummary::default();
        assert!(summary.is_empty());
        assert_eq!(summary.grand_total, 0.0);
    }
}
