//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite table:
//! - users(id, surname, date, graduate, classObject)

pub mod schema;
pub mod sqlite;

pub use sqlite::{RecordStore, StoreStats};
