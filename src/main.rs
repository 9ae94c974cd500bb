//! Roster CLI - record book for people entries backed by SQLite

use clap::{Args, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use roster::config::{self, RosterConfig};
use roster::record::parse_line_id;
use roster::shell::FormShell;
use roster::ui::{self, Icons};
use roster::{Record, RecordFields, RecordStore, RecordView};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "roster")]
#[command(version)]
#[command(about = "Record book for people entries - surname, date, graduate status and class")]
#[command(long_about = r#"
Roster keeps one table of entries in a local SQLite file and lets you:
  • Add entries from four free-text fields
  • List every entry, or search by substring on any combination of fields
  • Remove entries by id

Run without a command to open the interactive form.

Example usage:
  roster add --surname Doe --date 2023-01-01 --graduate yes --class Math
  roster search --surname Smi --class B
  roster remove --line "ID: 1, Surname: Doe, Date: 2023-01-01, Graduate: yes, Class: Math"
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (defaults to mydatabase.db next to the executable)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive form (default)
    Shell,

    /// Add an entry
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// List every entry
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show entries whose fields contain the given text (empty fields match all)
    Search {
        #[command(flatten)]
        fields: FieldArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Remove an entry
    Remove {
        /// Id of the entry
        #[arg(long, conflicts_with = "line", required_unless_present = "line")]
        id: Option<i64>,

        /// A display line as printed by `list`; its leading id is used
        #[arg(long)]
        line: Option<String>,
    },

    /// Show statistics about the database
    Stats {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// Write a config file pointing at the database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long, default_value = "")]
    surname: String,

    #[arg(long, default_value = "")]
    date: String,

    #[arg(long, default_value = "")]
    graduate: String,

    #[arg(long = "class", default_value = "")]
    class_object: String,
}

impl From<FieldArgs> for RecordFields {
    fn from(args: FieldArgs) -> Self {
        RecordFields::new(args.surname, args.date, args.graduate, args.class_object)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Table,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let loaded = config::load_config(Some(&config_path))?;
    let database = config::resolve_database_path(cli.database.as_deref(), loaded.as_ref());
    tracing::debug!("Using database {}", database.display());

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let view = RecordView::open(&database);
            let mut shell = FormShell::new(view);
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            shell.run(stdin.lock(), &mut stdout)?;
        }

        Commands::Add { fields } => {
            let store = RecordStore::open(&database)?;
            let record = store.insert(&fields.into())?;
            ui::success(&format!("{} Data added to database", Icons::NEW));
            ui::record_line(&record.display_line());
        }

        Commands::List { format } => {
            let store = RecordStore::open(&database)?;
            let records = store.list_all()?;
            print_records(&records, format)?;
        }

        Commands::Search { fields, format } => {
            let store = RecordStore::open(&database)?;
            let filter: RecordFields = fields.into();
            if matches!(format, Format::Text) {
                eprintln!("{} Searching {:?}", Icons::SEARCH, filter);
            }
            let records = store.search(&filter)?;
            print_records(&records, format)?;
        }

        Commands::Remove { id, line } => {
            let id = match (id, line) {
                (Some(id), _) => id,
                (None, Some(line)) => parse_line_id(&line)?,
                (None, None) => anyhow::bail!("either --id or --line is required"),
            };

            let store = RecordStore::open(&database)?;
            if store.delete_by_id(id)? {
                println!("{} Removed record {}", Icons::DEL, id);
            } else {
                ui::warn(&format!("No record with id {}", id));
            }
        }

        Commands::Stats { format } => {
            let store = RecordStore::open(&database)?;
            let stats = store.stats()?;
            match format {
                Format::Json => {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                    return Ok(());
                }
                Format::Text => {
                    print!("{}", stats);
                    return Ok(());
                }
                Format::Table => {}
            }

            let records = stats.records.to_string();
            let last_id = stats
                .last_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            let next_id = stats.next_id.to_string();

            ui::header("Roster Statistics");
            ui::info("Database", &database.display().to_string());
            println!(
                "{}",
                ui::stats_table(&[
                    ("Records", records.as_str()),
                    ("Last id", last_id.as_str()),
                    ("Next id", next_id.as_str()),
                ])
            );
        }

        Commands::Init { force } => {
            run_init(&config_path, &database, force)?;
        }
    }

    Ok(())
}

fn print_records(records: &[Record], format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(records)?),
        Format::Table => {
            if records.is_empty() {
                println!("∅ No records found.");
            } else {
                println!("{}", ui::RecordTable::new(records).build());
            }
        }
        Format::Text => {
            if records.is_empty() {
                println!("∅ No records found.");
            }
            for record in records {
                ui::record_line(&record.display_line());
            }
        }
    }
    Ok(())
}

fn run_init(config_path: &Path, database: &Path, force: bool) -> anyhow::Result<()> {
    ui::section("Initialize");
    let config = RosterConfig {
        database: Some(database.display().to_string()),
    };
    config::write_config(config_path, &config, force)?;
    config::ensure_db_dir(database)?;

    // Opening creates the file and the table
    RecordStore::open(database)?;

    ui::summary_row(&format!("{} Config", Icons::GEAR), &config_path.display().to_string());
    ui::summary_row(&format!("{} Database", Icons::DATABASE), &database.display().to_string());
    ui::success(&format!("{}", "Ready".bold()));
    Ok(())
}
