//! SQLite-backed key-value store.
//!
//! Stands in for the platform's shared app-group defaults: a single `kv`
//! table keyed by string, holding the JSON blobs written by
//! [`super::SharedStore`].

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::data_dir;
use super::kv::KeyValueStore;
use crate::error::StoreError;

/// SQLite database holding the shared key-value table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/nodrunk.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        Self::open_at(data_dir()?.join("nodrunk.db"))
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value BLOB NOT NULL
            );",
        )
    }

    /// Every key currently present, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let keys = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.get("test").unwrap().is_none());
        db.set("test", b"hello").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), b"hello");
        db.set("test", b"again").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), b"again");
        assert_eq!(db.keys().unwrap(), vec!["test".to_string()]);
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set("contacts", b"[]").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get("contacts").unwrap().unwrap(), b"[]");
    }
}
