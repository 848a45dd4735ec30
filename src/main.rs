use chrono::{DateTime, Local, NaiveDate, TimeZone};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::{Result, WrapErr, eyre};
use std::path::PathBuf;
use todolist::{BackgroundKv, Config, KeyValueStore, Priority, SqliteKv, Task, TaskStore, ThemeMode, theme};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "todolist - a single to-do list with local persistence")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Directory holding the database (default: platform data directory)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// YAML config file (default: <data-dir>/config.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every task in list order
    List,

    /// Append a task
    Add {
        text: String,

        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,

        /// 0 = none, 1 = low, 2 = medium, 3 = high
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(0..=3))]
        priority: i64,

        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Change fields of the task at INDEX
    Edit {
        index: usize,

        #[arg(long)]
        text: Option<String>,

        #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..=3))]
        priority: Option<i64>,

        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Delete the task at INDEX (undo with `undo`)
    Delete { index: usize },

    /// Restore the most recently deleted task
    Undo,

    /// Show or change the light/dark theme preference
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
    Light,
    Dark,
    System,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref(), cli.data_dir.as_deref())?;
    let data_dir = config.data_dir();
    info!(data_dir = ?data_dir, background = config.background_save, "Opening task store");

    let sqlite = SqliteKv::open(&data_dir).wrap_err_with(|| format!("Failed to open store in {}", data_dir.display()))?;
    let kv: Box<dyn KeyValueStore> = if config.background_save {
        Box::new(BackgroundKv::spawn(sqlite))
    } else {
        Box::new(sqlite)
    };

    let mut store = TaskStore::open(kv, config.keys.clone())?;

    // Read-only commands must not rewrite an unparseable stored list
    let mutates = !matches!(
        cli.command,
        Commands::List
            | Commands::Theme {
                action: ThemeAction::Show
            }
    );

    match cli.command {
        Commands::List => print_tasks(store.tasks()),
        Commands::Add {
            text,
            due,
            priority,
            tag,
        } => {
            let text = non_empty(&text)?;
            let due_date = due.map(date_to_millis).unwrap_or(0);
            match tag {
                Some(tag) => store.add(Task::with_tag(text, due_date, priority, tag)),
                None => {
                    store.add_task(text, due_date, priority);
                }
            }
            println!("Task added");
        }
        Commands::Edit {
            index,
            text,
            priority,
            due,
            clear_due,
            tag,
        } => {
            let text = text.as_deref().map(non_empty).transpose()?;
            let due_date = match (due, clear_due) {
                (Some(date), _) => Some(date_to_millis(date)),
                (None, true) => Some(0),
                (None, false) => None,
            };

            store.update(index, |task| {
                if let Some(text) = text {
                    task.text = text.to_string();
                }
                if let Some(priority) = priority {
                    task.priority = priority;
                }
                if let Some(due_date) = due_date {
                    task.due_date = due_date;
                }
                if let Some(tag) = tag {
                    task.tag = tag;
                }
            })?;
            println!("Task {} updated", index);
        }
        Commands::Delete { index } => {
            let removed = store.delete_task(index)?;
            println!("Task deleted: {} (run `todolist undo` to restore)", removed.text);
        }
        Commands::Undo => match store.undo_delete()? {
            Some(index) => println!("Task restored at {}", index),
            None => println!("Nothing to undo"),
        },
        Commands::Theme { action } => {
            let keys = store.keys().clone();
            let mode = match action {
                ThemeAction::Show => theme::load_theme(store.kv(), &keys),
                ThemeAction::Toggle => theme::toggle_theme(store.kv_mut(), &keys)?,
                ThemeAction::Light => set_theme(&mut store, ThemeMode::Light)?,
                ThemeAction::Dark => set_theme(&mut store, ThemeMode::Dark)?,
                ThemeAction::System => set_theme(&mut store, ThemeMode::FollowSystem)?,
            };
            println!("Theme: {}", mode);
        }
    }

    if mutates {
        store.flush().wrap_err("Failed to flush task store")?;
    }
    Ok(())
}

fn set_theme<K: KeyValueStore>(store: &mut TaskStore<K>, mode: ThemeMode) -> Result<ThemeMode> {
    let keys = store.keys().clone();
    theme::save_theme(store.kv_mut(), &keys, mode)?;
    Ok(mode)
}

fn non_empty(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(eyre!("Task text cannot be empty"));
    }
    Ok(text)
}

/// Local midnight of the given day, in milliseconds since the epoch
fn date_to_millis(date: NaiveDate) -> i64 {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
        .max(0)
}

fn format_due_date(millis: i64) -> Option<String> {
    if millis <= 0 {
        return None;
    }
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&Local).format("%b %d, %Y").to_string())
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks");
        return;
    }

    for (index, task) in tasks.iter().enumerate() {
        let marker = match task.priority_level() {
            Priority::High => "!!!".red().bold(),
            Priority::Medium => "!! ".yellow(),
            Priority::Low => "!  ".green(),
            Priority::None => "   ".normal(),
        };

        let mut line = format!("{:>3}  {} {}  {}", index, marker, task.text, format!("[{}]", task.tag).dimmed());
        if let Some(due) = format_due_date(task.due_date) {
            line.push_str(&format!("  {}", format!("due {}", due).cyan()));
        }
        println!("{}", line);
    }
}
