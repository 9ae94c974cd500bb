use crate::record::Record;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Surname")]
    surname: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Graduate")]
    graduate: String,
    #[tabled(rename = "Class")]
    class_object: String,
}

impl From<&Record> for RecordRow {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            surname: record.surname.clone(),
            date: record.date.clone(),
            graduate: record.graduate.clone(),
            class_object: record.class_object.clone(),
        }
    }
}

/// Records laid out as a rounded table, one row per record
pub struct RecordTable {
    rows: Vec<RecordRow>,
}

impl RecordTable {
    pub fn new(records: &[Record]) -> Self {
        Self {
            rows: records.iter().map(RecordRow::from).collect(),
        }
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let rows: Vec<StatRow> = stats
        .iter()
        .map(|(label, value)| StatRow {
            metric: label.to_string(),
            value: value.to_string(),
        })
        .collect();
    if rows.is_empty() {
        return String::new();
    }
    Table::new(&rows).with(Style::rounded()).to_string()
}
