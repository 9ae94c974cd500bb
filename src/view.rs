//! Presentation adapter
//!
//! `RecordView` is the list the user looks at. It owns the store handle,
//! keeps one entry per visible line (with the record id stored next to the
//! rendered text), and turns form actions into store calls.
//!
//! A view without a store is "detached": it stays usable as a value, but
//! every action reports `Error::StoreUnavailable`.

use std::path::Path;
use crate::{Error, Result};
use crate::record::{Record, RecordFields};
use crate::storage::RecordStore;

/// One visible line of the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: i64,
    pub text: String,
}

impl From<&Record> for ListEntry {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            text: record.display_line(),
        }
    }
}

/// Result of a remove action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// No line was selected; nothing happened
    NothingSelected,
    /// The row existed and was deleted
    Removed(i64),
    /// The row was already gone from the store; the stale line was dropped
    Missing(i64),
}

pub struct RecordView {
    store: Option<RecordStore>,
    entries: Vec<ListEntry>,
    selected: Option<usize>,
}

impl RecordView {
    /// Build a view over an open store and show every record
    pub fn new(store: RecordStore) -> Result<Self> {
        let mut view = Self {
            store: Some(store),
            entries: Vec::new(),
            selected: None,
        };
        view.refresh()?;
        Ok(view)
    }

    /// A view with no store attached
    pub fn detached() -> Self {
        Self {
            store: None,
            entries: Vec::new(),
            selected: None,
        }
    }

    /// Open the store at `path` and show every record.
    ///
    /// Opening never fails from the caller's point of view: when the store
    /// cannot be opened or its table cannot be created, the failure is logged
    /// and a detached view is returned.
    pub fn open(path: &Path) -> Self {
        match RecordStore::open(path).and_then(Self::new) {
            Ok(view) => {
                tracing::info!("Database {} opened", path.display());
                view
            }
            Err(e) => {
                tracing::error!("Failed to open the database: {}", e);
                Self::detached()
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Result<&RecordStore> {
        self.store
            .as_ref()
            .ok_or_else(|| Error::StoreUnavailable("no database is open".to_string()))
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    /// Rendered lines, top to bottom
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Select the line at `index`. Returns false if there is no such line.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<(usize, &ListEntry)> {
        self.selected
            .and_then(|i| self.entries.get(i).map(|entry| (i, entry)))
    }

    /// View all: replace the list with every stored record
    pub fn refresh(&mut self) -> Result<usize> {
        let records = self.store()?.list_all()?;
        self.replace(&records);
        Ok(self.entries.len())
    }

    /// Insert a record and append its line. The list is untouched on failure.
    pub fn add(&mut self, fields: &RecordFields) -> Result<&ListEntry> {
        let record = self.store()?.insert(fields)?;
        self.entries.push(ListEntry::from(&record));
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Replace the list with the records matching `filter`.
    /// The list is untouched on failure.
    pub fn search(&mut self, filter: &RecordFields) -> Result<usize> {
        let records = self.store()?.search(filter)?;
        self.replace(&records);
        Ok(self.entries.len())
    }

    /// Delete the record behind the selected line
    pub fn remove_selected(&mut self) -> Result<RemoveOutcome> {
        let Some((index, entry)) = self.selected() else {
            tracing::info!("No item selected to remove");
            return Ok(RemoveOutcome::NothingSelected);
        };
        let id = entry.id;

        let removed = self.store()?.delete_by_id(id)?;
        self.entries.remove(index);
        self.selected = None;

        if removed {
            Ok(RemoveOutcome::Removed(id))
        } else {
            tracing::warn!("Record {} was already gone from the database", id);
            Ok(RemoveOutcome::Missing(id))
        }
    }

    fn replace(&mut self, records: &[Record]) {
        self.entries = records.iter().map(ListEntry::from).collect();
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with(rows: &[(&str, &str, &str, &str)]) -> RecordView {
        let mut view = RecordView::new(RecordStore::open_in_memory().unwrap()).unwrap();
        for (s, d, g, c) in rows {
            view.add(&RecordFields::new(*s, *d, *g, *c)).unwrap();
        }
        view
    }

    #[test]
    fn test_add_appends_line() {
        let mut view = view_with(&[]);
        assert!(view.is_empty());

        let entry = view
            .add(&RecordFields::new("Doe", "2023-01-01", "yes", "Math"))
            .unwrap()
            .clone();
        assert_eq!(entry.id, 1);
        assert_eq!(
            entry.text,
            "ID: 1, Surname: Doe, Date: 2023-01-01, Graduate: yes, Class: Math"
        );
        assert_eq!(view.lines().collect::<Vec<_>>(), vec![entry.text.as_str()]);
    }

    #[test]
    fn test_new_shows_existing_records() {
        let store = RecordStore::open_in_memory().unwrap();
        store.insert(&RecordFields::new("A", "1", "yes", "X")).unwrap();
        store.insert(&RecordFields::new("B", "2", "no", "Y")).unwrap();

        let view = RecordView::new(store).unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view.entries()[1].id, 2);
    }

    #[test]
    fn test_search_replaces_and_refresh_restores() {
        let mut view = view_with(&[("Smith", "2020", "yes", "A"), ("Smithson", "2021", "no", "B")]);

        assert_eq!(view.search(&RecordFields::new("Smith", "", "", "B")).unwrap(), 1);
        assert!(view.lines().next().unwrap().contains("Smithson"));

        assert_eq!(view.search(&RecordFields::new("Nobody", "", "", "")).unwrap(), 0);
        assert!(view.is_empty());

        assert_eq!(view.refresh().unwrap(), 2);
        let first: Vec<ListEntry> = view.entries().to_vec();
        view.refresh().unwrap();
        assert_eq!(view.entries(), first.as_slice());
    }

    #[test]
    fn test_remove_selected() {
        let mut view = view_with(&[("A", "1", "yes", "X"), ("B", "2", "no", "Y")]);

        assert_eq!(view.remove_selected().unwrap(), RemoveOutcome::NothingSelected);
        assert_eq!(view.len(), 2);

        assert!(view.select(0));
        assert_eq!(view.remove_selected().unwrap(), RemoveOutcome::Removed(1));
        assert_eq!(view.len(), 1);
        assert_eq!(view.entries()[0].id, 2);
        assert!(view.selected().is_none());

        let stored = view.store().unwrap().list_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].surname, "B");
    }

    #[test]
    fn test_remove_stale_line() {
        let mut view = view_with(&[("A", "1", "yes", "X")]);
        view.store().unwrap().delete_by_id(1).unwrap();

        assert!(view.select(0));
        assert_eq!(view.remove_selected().unwrap(), RemoveOutcome::Missing(1));
        assert!(view.is_empty());
    }

    #[test]
    fn test_select_out_of_range() {
        let mut view = view_with(&[("A", "1", "yes", "X")]);
        assert!(!view.select(1));
        assert!(view.selected().is_none());
        assert!(view.select(0));
        assert_eq!(view.selected().unwrap().1.id, 1);
    }

    #[test]
    fn test_failed_actions_leave_list_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.db");
        let mut view = RecordView::open(&path);
        view.add(&RecordFields::new("Doe", "2023-01-01", "yes", "Math")).unwrap();
        assert!(view.select(0));
        let before = view.entries().to_vec();

        let other = rusqlite::Connection::open(&path).unwrap();
        other.execute_batch("BEGIN EXCLUSIVE;").unwrap();

        let added = view.add(&RecordFields::new("Late", "2024", "no", "Art")).cloned();
        assert!(matches!(added, Err(Error::Write(_))), "{added:?}");
        assert_eq!(view.entries(), before.as_slice());

        let removed = view.remove_selected();
        assert!(matches!(removed, Err(Error::Write(_))), "{removed:?}");
        assert_eq!(view.entries(), before.as_slice());
        assert_eq!(view.selected().map(|(i, _)| i), Some(0));

        let searched = view.search(&RecordFields::new("Doe", "", "", ""));
        assert!(matches!(searched, Err(Error::Query(_))), "{searched:?}");
        assert_eq!(view.entries(), before.as_slice());

        other.execute_batch("ROLLBACK;").unwrap();
        assert_eq!(view.refresh().unwrap(), 1);
        assert_eq!(view.entries(), before.as_slice());
    }

    #[test]
    fn test_clear_selection() {
        let mut view = view_with(&[("A", "1", "yes", "X")]);
        assert!(view.select(0));
        view.clear_selection();
        assert!(view.selected().is_none());
        assert_eq!(view.remove_selected().unwrap(), RemoveOutcome::NothingSelected);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_detached_view_fails_every_action() {
        let dir = tempfile::tempdir().unwrap();
        let mut view = RecordView::open(&dir.path().join("missing").join("roster.db"));
        assert!(!view.is_attached());

        let fields = RecordFields::new("Doe", "2023-01-01", "yes", "Math");
        assert!(matches!(view.add(&fields), Err(Error::StoreUnavailable(_))));
        assert!(matches!(view.search(&fields), Err(Error::StoreUnavailable(_))));
        assert!(matches!(view.refresh(), Err(Error::StoreUnavailable(_))));
        assert!(view.is_empty());

        // nothing selected is still the benign no-op
        assert_eq!(view.remove_selected().unwrap(), RemoveOutcome::NothingSelected);
    }

    #[test]
    fn test_open_file_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.db");

        let mut view = RecordView::open(&path);
        assert!(view.is_attached());
        view.add(&RecordFields::new("Doe", "2023-01-01", "yes", "Math")).unwrap();
        drop(view);

        let view = RecordView::open(&path);
        assert_eq!(view.len(), 1);
    }
}
