//! Interactive form shell
//!
//! A line-oriented stand-in for a data-entry window: four text fields, a
//! list of records, and the add / search / view all / remove / close
//! actions. Reads commands from any `BufRead` and writes to any `Write`, so
//! it runs equally on a terminal or under test.

use std::io::{BufRead, Write};
use crate::Result;
use crate::record::{Field, RecordFields};
use crate::view::{RecordView, RemoveOutcome};

const PROMPT: &str = "roster> ";

const HELP: &str = "\
Fields:
  surname <text>    set the surname field (no text clears it)
  date <text>       set the date field
  graduate <text>   set the graduate field
  class <text>      set the class field
  fields            show the current field values
  clear             clear all fields
Actions:
  add               add a record from the current fields
  search            show records matching the non-empty fields
  all               show every record
  list              show the current list again
  select <n>        select line n of the list
  deselect          clear the selection
  remove            delete the selected record
  close             leave the shell (also: quit, exit)
";

/// Whether the shell keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

pub struct FormShell {
    view: RecordView,
    fields: RecordFields,
}

impl FormShell {
    pub fn new(view: RecordView) -> Self {
        Self {
            view,
            fields: RecordFields::default(),
        }
    }

    pub fn view(&self) -> &RecordView {
        &self.view
    }

    pub fn fields(&self) -> &RecordFields {
        &self.fields
    }

    /// Run until `close` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        if !self.view.is_attached() {
            writeln!(out, "warning: no database is open; every action will fail")?;
        }
        self.print_list(out)?;

        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            if self.execute(&line?, out)? == Flow::Close {
                break;
            }
        }
        Ok(())
    }

    /// Execute a single command line.
    ///
    /// Store failures are reported to `out` and logged; only I/O errors on
    /// `out` itself are returned.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (command, arg) = match line.trim_start().split_once(' ') {
            Some((command, arg)) => (command, arg),
            None => (line.trim(), ""),
        };

        match command {
            "" => {}
            "help" | "?" => write!(out, "{}", HELP)?,
            "close" | "quit" | "exit" => return Ok(Flow::Close),
            "fields" => self.print_fields(out)?,
            "clear" => {
                self.fields.clear();
                self.print_fields(out)?;
            }
            "list" => self.print_list(out)?,
            "all" => match self.view.refresh() {
                Ok(_) => self.print_list(out)?,
                Err(e) => report(out, "view all", &e)?,
            },
            "add" => match self.view.add(&self.fields) {
                Ok(entry) => writeln!(out, "added: {}", entry.text)?,
                Err(e) => report(out, "add", &e)?,
            },
            "search" => match self.view.search(&self.fields) {
                Ok(_) => {
                    if self.fields.is_empty() {
                        writeln!(out, "no filters set; showing every record")?;
                    }
                    self.print_list(out)?
                }
                Err(e) => report(out, "search", &e)?,
            },
            "select" => match arg.trim().parse::<usize>() {
                Ok(index) if self.view.select(index) => {
                    if let Some((_, entry)) = self.view.selected() {
                        writeln!(out, "selected: {}", entry.text)?;
                    }
                }
                Ok(index) => writeln!(out, "no line {} in the list", index)?,
                Err(_) => writeln!(out, "usage: select <n>")?,
            },
            "deselect" => {
                self.view.clear_selection();
                self.print_list(out)?;
            }
            "remove" => match self.view.remove_selected() {
                Ok(RemoveOutcome::NothingSelected) => writeln!(out, "No item selected to remove.")?,
                Ok(RemoveOutcome::Removed(id)) => writeln!(out, "removed record {}", id)?,
                Ok(RemoveOutcome::Missing(id)) => {
                    writeln!(out, "record {} was already gone; line dropped", id)?
                }
                Err(e) => report(out, "remove", &e)?,
            },
            other => match other.parse::<Field>() {
                Ok(field) => {
                    self.fields.set(field, arg);
                    writeln!(out, "{} = {:?}", field, arg)?;
                }
                Err(_) => writeln!(out, "unknown command {:?} (try `help`)", other)?,
            },
        }
        Ok(Flow::Continue)
    }

    fn print_fields<W: Write>(&self, out: &mut W) -> Result<()> {
        for field in Field::all() {
            writeln!(out, "  {:<9}{:?}", field.as_str(), self.fields.get(*field))?;
        }
        Ok(())
    }

    fn print_list<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.view.is_empty() {
            writeln!(out, "(no records)")?;
            return Ok(());
        }
        let selected = self.view.selected().map(|(i, _)| i);
        for (i, entry) in self.view.entries().iter().enumerate() {
            let marker = if selected == Some(i) { '>' } else { ' ' };
            writeln!(out, "{} [{}] {}", marker, i, entry.text)?;
        }
        Ok(())
    }
}

fn report<W: Write>(out: &mut W, action: &str, err: &crate::Error) -> Result<()> {
    tracing::error!("{} failed: {}", action, err);
    writeln!(out, "error: {} failed: {}", action, err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecordStore;
    use std::io::Cursor;

    fn shell() -> FormShell {
        FormShell::new(RecordView::new(RecordStore::open_in_memory().unwrap()).unwrap())
    }

    fn run_script(shell: &mut FormShell, script: &str) -> String {
        let mut out = Vec::new();
        shell.run(Cursor::new(script.to_string()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_add_from_fields() {
        let mut shell = shell();
        let output = run_script(
            &mut shell,
            "surname Doe\ndate 2023-01-01\ngraduate yes\nclass Math\nadd\nclose\n",
        );

        assert!(output.contains(
            "added: ID: 1, Surname: Doe, Date: 2023-01-01, Graduate: yes, Class: Math"
        ));
        assert_eq!(shell.view().len(), 1);
    }

    #[test]
    fn test_search_then_remove() {
        let mut shell = shell();
        let script = "\
surname Smith
date 2020
graduate yes
class A
add
surname Smithson
date 2021
graduate no
class B
add
clear
class B
search
select 0
remove
all
";
        let output = run_script(&mut shell, script);

        assert!(output.contains("selected: ID: 2, Surname: Smithson"));
        assert!(output.contains("removed record 2"));
        assert_eq!(shell.view().len(), 1);
        assert_eq!(shell.view().entries()[0].id, 1);
    }

    #[test]
    fn test_empty_search_shows_everything() {
        let mut shell = shell();
        let output = run_script(&mut shell, "surname A\nadd\nsurname B\nadd\nclear\nsearch\n");
        assert!(output.contains("no filters set; showing every record"));
        assert_eq!(shell.view().len(), 2);
    }

    #[test]
    fn test_deselect_then_remove_is_noop() {
        let mut shell = shell();
        let output = run_script(&mut shell, "surname A\nadd\nselect 0\ndeselect\nremove\n");
        assert!(output.contains("No item selected to remove."));
        assert!(shell.view().selected().is_none());
        assert_eq!(shell.view().len(), 1);
    }

    #[test]
    fn test_remove_without_selection() {
        let mut shell = shell();
        let mut out = Vec::new();
        assert_eq!(shell.execute("remove", &mut out).unwrap(), Flow::Continue);
        assert!(String::from_utf8(out).unwrap().contains("No item selected to remove."));
    }

    #[test]
    fn test_field_text_kept_verbatim() {
        let mut shell = shell();
        let mut out = Vec::new();
        shell.execute("surname van der Berg", &mut out).unwrap();
        assert_eq!(shell.fields().surname, "van der Berg");
        shell.execute("surname", &mut out).unwrap();
        assert_eq!(shell.fields().surname, "");
    }

    #[test]
    fn test_close_stops_reading() {
        let mut shell = shell();
        run_script(&mut shell, "close\nsurname X\nadd\n");
        assert!(shell.view().is_empty());
    }

    #[test]
    fn test_unknown_command_and_bad_select() {
        let mut shell = shell();
        let mut out = Vec::new();
        shell.execute("frobnicate", &mut out).unwrap();
        shell.execute("select x", &mut out).unwrap();
        shell.execute("select 3", &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("unknown command \"frobnicate\""));
        assert!(output.contains("usage: select <n>"));
        assert!(output.contains("no line 3 in the list"));
    }

    #[test]
    fn test_detached_shell_reports_failures() {
        let mut shell = FormShell::new(RecordView::detached());
        let output = run_script(&mut shell, "surname Doe\nadd\nsearch\nall\n");

        assert_eq!(output.matches("warning: no database is open").count(), 1);
        assert!(output.contains("error: add failed: Store unavailable"));
        assert!(output.contains("error: search failed"));
        assert!(output.contains("error: view all failed"));
        assert!(shell.view().is_empty());
    }
}
