//! # Roster - local record book
//!
//! Keeps entries describing people (surname, date, graduate status, class)
//! in a single SQLite table.
//!
//! Roster provides:
//! - `RecordStore`: schema ownership and all reads/writes of records
//! - `RecordView`: the list the user sees, with selection, bound to a store
//! - An interactive line-oriented form shell over any reader/writer pair

pub mod record;
pub mod storage;
pub mod view;
pub mod shell;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use record::{Field, Record, RecordFields};
pub use storage::RecordStore;
pub use view::{ListEntry, RecordView, RemoveOutcome};

/// Result type alias for Roster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Roster operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing file could not be opened or created, or no store is attached
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Schema error: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("Write error: {0}")]
    Write(#[source] rusqlite::Error),

    #[error("Query error: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("Invalid display line: {0:?}")]
    InvalidLine(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
