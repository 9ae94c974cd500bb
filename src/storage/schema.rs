//! Database schema definitions

/// SQL to create the users table
///
/// `AUTOINCREMENT` keeps ids monotonic, so an id freed by a delete is never
/// handed out again.
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    surname TEXT NOT NULL,
    date TEXT NOT NULL,
    graduate TEXT NOT NULL,
    classObject TEXT NOT NULL
)
"#;

/// Column list shared by every record query, in `Record` field order
pub const RECORD_COLUMNS: &str = "id, surname, date, graduate, classObject";

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_USERS_TABLE]
}
