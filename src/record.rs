//! Record types
//!
//! A record describes one person: surname, date, graduate status and class.
//! Every text field is free-form; the store assigns the id on insert.

use crate::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use std::sync::OnceLock;

/// The four free-text fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Surname,
    Date,
    Graduate,
    Class,
}

impl Field {
    /// Get the string representation of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Surname => "surname",
            Field::Date => "date",
            Field::Graduate => "graduate",
            Field::Class => "class",
        }
    }

    /// Get all fields, in form order
    pub fn all() -> &'static [Field] {
        &[Field::Surname, Field::Date, Field::Graduate, Field::Class]
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "surname" | "name" => Ok(Field::Surname),
            "date" => Ok(Field::Date),
            "graduate" | "grad" => Ok(Field::Graduate),
            "class" | "classobject" => Ok(Field::Class),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field values without an id.
///
/// Used as the insert payload and as a search filter, where an empty value
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
    pub surname: String,
    pub date: String,
    pub graduate: String,
    pub class_object: String,
}

impl RecordFields {
    pub fn new(
        surname: impl Into<String>,
        date: impl Into<String>,
        graduate: impl Into<String>,
        class_object: impl Into<String>,
    ) -> Self {
        Self {
            surname: surname.into(),
            date: date.into(),
            graduate: graduate.into(),
            class_object: class_object.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Surname => &self.surname,
            Field::Date => &self.date,
            Field::Graduate => &self.graduate,
            Field::Class => &self.class_object,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Surname => self.surname = value,
            Field::Date => self.date = value,
            Field::Graduate => self.graduate = value,
            Field::Class => self.class_object = value,
        }
    }

    /// True when every field is empty (a filter that matches all rows)
    pub fn is_empty(&self) -> bool {
        Field::all().iter().all(|f| self.get(*f).is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Store-assigned id, never reused
    pub id: i64,
    pub surname: String,
    pub date: String,
    pub graduate: String,
    #[serde(rename = "classObject")]
    pub class_object: String,
}

impl Record {
    /// Combine a freshly assigned id with the fields that were inserted
    pub fn from_fields(id: i64, fields: RecordFields) -> Self {
        Self {
            id,
            surname: fields.surname,
            date: fields.date,
            graduate: fields.graduate,
            class_object: fields.class_object,
        }
    }

    /// The single-line list form of this record
    pub fn display_line(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {}, Surname: {}, Date: {}, Graduate: {}, Class: {}",
            self.id, self.surname, self.date, self.graduate, self.class_object
        )
    }
}

fn line_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^ID: (\d+),").expect("static pattern"))
}

/// Extract the id from a rendered display line (`"ID: 7, Surname: ..."`).
pub fn parse_line_id(line: &str) -> Result<i64> {
    line_id_pattern()
        .captures(line.trim_start())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| Error::InvalidLine(line.to_string()))
}
