//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OptionalExtension, params};
use crate::{Error, Result};
use crate::record::{Record, RecordFields};
use super::schema::{self, RECORD_COLUMNS};

/// SQLite-backed storage for records
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| Error::StoreUnavailable(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Opened database {}", path.display());
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, []).map_err(Error::Schema)?;
        }
        tracing::debug!("Table 'users' created or already exists");
        Ok(())
    }

    // ========== Record Operations ==========

    /// Insert a record, returning it with its newly assigned id
    pub fn insert(&self, fields: &RecordFields) -> Result<Record> {
        self.conn
            .execute(
                r#"
                INSERT INTO users (surname, date, graduate, classObject)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    fields.surname,
                    fields.date,
                    fields.graduate,
                    fields.class_object,
                ],
            )
            .map_err(Error::Write)?;

        let id = self.conn.last_insert_rowid();
        tracing::info!("Added record {} to database", id);
        Ok(Record::from_fields(id, fields.clone()))
    }

    /// Delete a record by id. Returns whether a row was removed.
    pub fn delete_by_id(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", [id])
            .map_err(Error::Write)?;

        if removed > 0 {
            tracing::info!("Removed record {} from database", id);
        } else {
            tracing::debug!("No record with id {} to remove", id);
        }
        Ok(removed > 0)
    }

    /// Get a record by id
    pub fn get(&self, id: i64) -> Result<Option<Record>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", RECORD_COLUMNS),
                [id],
                Self::row_to_record,
            )
            .optional()
            .map_err(Error::Query)
    }

    /// All records, in insertion order
    pub fn list_all(&self) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM users ORDER BY id", RECORD_COLUMNS))
            .map_err(Error::Query)?;

        let records = stmt
            .query_map([], Self::row_to_record)
            .map_err(Error::Query)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::Query)?;

        Ok(records)
    }

    /// Find records whose fields contain every non-empty filter value.
    ///
    /// Filter text matches literally: `%`, `_` and `\` are escaped before
    /// being handed to `LIKE`, so only substring containment is tested.
    /// Matching is ASCII case-insensitive.
    pub fn search(&self, filter: &RecordFields) -> Result<Vec<Record>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM users
            WHERE surname LIKE ?1 ESCAPE '\'
              AND date LIKE ?2 ESCAPE '\'
              AND graduate LIKE ?3 ESCAPE '\'
              AND classObject LIKE ?4 ESCAPE '\'
            ORDER BY id
            "#,
            RECORD_COLUMNS
        );

        let mut stmt = self.conn.prepare(&sql).map_err(Error::Query)?;

        let records = stmt
            .query_map(
                params![
                    contains_pattern(&filter.surname),
                    contains_pattern(&filter.date),
                    contains_pattern(&filter.graduate),
                    contains_pattern(&filter.class_object),
                ],
                Self::row_to_record,
            )
            .map_err(Error::Query)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::Query)?;

        tracing::debug!("Search {:?} matched {} records", filter, records.len());
        Ok(records)
    }

    /// Count all records
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(Error::Query)?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<StoreStats> {
        let last_id: Option<i64> = self
            .conn
            .query_row("SELECT MAX(id) FROM users", [], |row| row.get(0))
            .map_err(Error::Query)?;

        // sqlite_sequence only has a row once AUTOINCREMENT has handed out an id
        let issued: Option<i64> = self
            .conn
            .query_row(
                "SELECT seq FROM sqlite_sequence WHERE name = 'users'",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::Query)?;

        Ok(StoreStats {
            records: self.count()?,
            last_id,
            next_id: issued.unwrap_or(0) + 1,
        })
    }

    /// Helper to convert a row to a Record
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Record> {
        Ok(Record {
            id: row.get(0)?,
            surname: row.get(1)?,
            date: row.get(2)?,
            graduate: row.get(3)?,
            class_object: row.get(4)?,
        })
    }
}

/// Build a `LIKE` pattern matching any value containing `text` literally.
/// Empty text matches every value.
fn contains_pattern(text: &str) -> String {
    if text.is_empty() {
        return "%".to_string();
    }

    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoreStats {
    pub records: usize,
    /// Highest id currently stored
    pub last_id: Option<i64>,
    /// Id the next insert will receive
    pub next_id: i64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Records: {}", self.records)?;
        match self.last_id {
            Some(id) => writeln!(f, "  Last id: {}", id)?,
            None => writeln!(f, "  Last id: -")?,
        }
        writeln!(f, "  Next id: {}", self.next_id)
    }
}
