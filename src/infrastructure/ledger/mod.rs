//! Ledger persistence infrastructure module

mod sqlite;

pub use sqlite::SqliteLedger;
