//! Roteiro — SQLite implementation of the storage port.

mod sqlite;

pub use sqlite::SqliteStorage;
