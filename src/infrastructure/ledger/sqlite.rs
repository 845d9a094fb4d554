//! SQLite ledger store adapter
//!
//! One long-lived connection guarded by a mutex serializes every
//! store call.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use crate::application::ports::{LedgerStore, StorageError};
use crate::domain::ledger::{CategoryTotal, ExpenseDraft, ExpenseRecord, LedgerSummary};

/// Records table name
const TABLE: &str = "records";

/// SQLite-backed expense ledger
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Open (or create) the ledger database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::OpenFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory ledger (used in tests)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StorageError::OpenFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LedgerStore for SqliteLedger {
    fn initialize(&self) -> Result<(), StorageError> {
        let conn = self.lock();
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {TABLE} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    dateTime TEXT,
                    itemName TEXT,
                    amount REAL,
                    currency TEXT,
                    category TEXT
                )"
            ),
            [],
        )
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    fn insert(&self, draft: &ExpenseDraft) -> Result<ExpenseRecord, StorageError> {
        let conn = self.lock();
        conn.execute(
            &format!(
                "INSERT INTO {TABLE} (dateTime, itemName, amount, currency, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ),
            params![
                draft.date_time,
                draft.item_name,
                draft.amount,
                draft.currency,
                draft.category
            ],
        )
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let id = conn.last_insert_rowid();
        Ok(ExpenseRecord::from_stored(id, draft.clone()))
    }

    fn list_all(&self) -> Result<Vec<ExpenseRecord>, StorageError> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT id, dateTime, itemName, amount, currency, category
                 FROM {TABLE} ORDER BY id ASC"
            ))
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ExpenseRecord {
                    id: row.get(0)?,
                    date_time: row.get(1)?,
                    item_name: row.get(2)?,
                    amount: row.get(3)?,
                    currency: row.get(4)?,
                    category: row.get(5)?,
                })
            })
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))
    }

    fn delete_by_id(&self, id: i64) -> Result<usize, StorageError> {
        let conn = self.lock();
        // Zero affected rows on an unknown id is the contract, not an
        // error
        conn.execute(&format!("DELETE FROM {TABLE} WHERE id = ?1"), params![id])
            .map_err(|e| StorageError::QueryFailed(e.to_string()))
    }

    fn delete_all(&self) -> Result<(), StorageError> {
        let conn = self.lock();
        conn.execute(&format!("DELETE FROM {TABLE}"), [])
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    fn aggregate(&self) -> Result<LedgerSummary, StorageError> {
        let conn = self.lock();

        let grand_total: f64 = conn
            .query_row(
                &format!("SELECT COALESCE(SUM(amount), 0) FROM {TABLE}"),
                [],
                |row| row.get(0),
            )
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT category, COALESCE(SUM(amount), 0) FROM {TABLE}
                 GROUP BY category ORDER BY category ASC"
            ))
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let category: String = row.get(0)?;
                let total: f64 = row.get(1)?;
                Ok((category, total))
            })
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let mut categories = Vec::new();
        for row in rows {
            let (category, total) = row.map_err(|e| StorageError::QueryFailed(e.to_string()))?;
            let percent = if grand_total == 0.0 {
                0.0
            } else {
                total / grand_total * 100.0
            };
            categories.push(CategoryTotal {
                category,
                total,
                percent,
            });
        }

        Ok(LedgerSummary {
            grand_total,
            categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_ledger() -> SqliteLedger {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        ledger.initialize().unwrap();
        ledger
    }

    fn draft(item: &str, amount: f64, category: &str) -> ExpenseDraft {
        ExpenseDraft::new("2024-01-01 12:00:00", item, amount, "JPY", category)
    }

    #[test]
    fn initialize_is_idempotent() {
        let ledger = open_ledger();
        ledger.initialize().unwrap();
        ledger.initialize().unwrap();
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let ledger = open_ledger();
        let first = ledger.insert(&draft("lunch", 1200.0, "food")).unwrap();
        let second = ledger.insert(&draft("soap", 400.0, "daily-goods")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn insert_accepts_empty_draft() {
        let ledger = open_ledger();
        let record = ledger.insert(&ExpenseDraft::default()).unwrap();
        assert_eq!(record.item_name, "");
        assert_eq!(record.amount, 0.0);
    }

    #[test]
    fn list_all_orders_by_id() {
        let ledger = open_ledger();
        ledger.insert(&draft("a", 1.0, "food")).unwrap();
        ledger.insert(&draft("b", 2.0, "food")).unwrap();
        ledger.insert(&draft("c", 3.0, "food")).unwrap();

        let records = ledger.list_all().unwrap();
        let items: Vec<_> = records.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[test]
    fn delete_by_id_removes_one() {
        let ledger = open_ledger();
        let record = ledger.insert(&draft("lunch", 1200.0, "food")).unwrap();
        ledger.insert(&draft("dinner", 2000.0, "food")).unwrap();

        let affected = ledger.delete_by_id(record.id).unwrap();
        assert_eq!(affected, 1);
        assert_eq!(ledger.list_all().unwrap().len(), 1);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let ledger = open_ledger();
        ledger.insert(&draft("lunch", 1200.0, "food")).unwrap();

        let affected = ledger.delete_by_id(9999).unwrap();
        assert_eq!(affected, 0);
        assert_eq!(ledger.list_all().unwrap().len(), 1);
    }

    #[test]
    fn aggregate_empty_store() {
        let ledger = open_ledger();
        let summary = ledger.aggregate().unwrap();
        assert_eq!(summary.grand_total, 0.0);
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn aggregate_groups_by_exact_category_string() {
        let ledger = open_ledger();
        ledger.insert(&draft("lunch", 1000.0, "food")).unwrap();
        ledger.insert(&draft("dinner", 3000.0, "food")).unwrap();
        ledger.insert(&draft("soap", 1000.0, "daily-goods")).unwrap();
        ledger.insert(&draft("mystery", 1000.0, "")).unwrap();

        let summary = ledger.aggregate().unwrap();
        assert_eq!(summary.grand_total, 6000.0);
        assert_eq!(summary.categories.len(), 3);

        let food = summary
            .categories
            .iter()
            .find(|c| c.category == "food")
            .unwrap();
        assert_eq!(food.total, 4000.0);
        assert!((food.percent - 66.666).abs() < 0.01);

        // Empty string is its own group
        let blank = summary
            .categories
            .iter()
            .find(|c| c.category.is_empty())
            .unwrap();
        assert_eq!(blank.total, 1000.0);
    }

    #[test]
    fn aggregate_zero_total_has_zero_percents() {
        let ledger = open_ledger();
        ledger.insert(&draft("freebie", 0.0, "food")).unwrap();

        let summary = ledger.aggregate().unwrap();
        assert_eq!(summary.grand_total, 0.0);
        assert_eq!(summary.categories.len(), 1);
        assert_eq!(summary.categories[0].percent, 0.0);
    }
}
