//! Database layer for the clinic.

mod schema;
mod persons;
mod schools;
mod patients;
mod psychologists;
mod agendas;
mod documents;

pub use schema::*;

use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, msg) if err.code == ErrorCode::ConstraintViolation => {
                DbError::Constraint(msg.clone().unwrap_or_else(|| err.to_string()))
            }
            _ => DbError::Sqlite(e),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Outcome of a find-or-create by natural key.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    /// No row had the key; this one was inserted.
    Created(T),
    /// A row with the key already existed and is returned as-is.
    Reused(T),
}

impl<T> Resolved<T> {
    pub fn was_created(&self) -> bool {
        matches!(self, Resolved::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Resolved::Created(value) | Resolved::Reused(value) => value,
        }
    }
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction: commit on `Ok`, roll back on `Err`.
    ///
    /// Every statement `f` issues through this `Database` belongs to the
    /// transaction. Calls must not nest.
    pub fn with_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Database) -> Result<T, E>,
        E: From<DbError>,
    {
        let tx = self.conn.unchecked_transaction().map_err(DbError::from)?;
        match f(self) {
            Ok(value) => {
                tx.commit().map_err(DbError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!(error = %rollback_err, "transaction rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Count rows of a table (used for reporting and tests).
    pub fn count_rows(&self, table: &str) -> DbResult<i64> {
        if !TABLES.contains(&table) {
            return Err(DbError::NotFound(format!("table {table}")));
        }
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count)
    }
}
