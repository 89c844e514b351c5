//! password-manager - local credential store
//!
//! A vim-style list view over app/user/password records, plus one-shot
//! commands for scripting.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{backend::CrosstermBackend, Terminal};

use password_manager::app::App;
use password_manager::config::{self, AppConfig};
use password_manager::logging::{init_logging, LogConfig};
use password_manager::{PasswordCell, Record, RecordManager, StoreError, SystemClipboard};

#[derive(Parser)]
#[command(name = "password-manager")]
#[command(about = "Local credential store with a masked list view")]
#[command(version)]
struct Cli {
    /// Store file (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive list view (default)
    Browse,

    /// Print records, passwords masked unless shown or --reveal
    List {
        /// Only records whose app or user name contains this text
        filter: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Print every password in plain text
        #[arg(long)]
        reveal: bool,
    },

    /// Add a record (prompts for the password when omitted)
    Add {
        app: String,
        user: String,
        password: Option<String>,
    },

    /// Change fields of a record
    Edit {
        /// Record ID or unique prefix
        id: String,
        #[arg(long)]
        app: Option<String>,
        #[arg(long)]
        user: Option<String>,
        /// New password; prompts when given without a value
        #[arg(long, num_args = 0..=1)]
        password: Option<Option<String>>,
    },

    /// Show a record's password in the list view
    Show { id: String },

    /// Mask a record's password in the list view
    Hide { id: String },

    /// Copy a shown password to the clipboard
    Copy { id: String },

    /// Delete a record
    Delete { id: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", error_report(&e));
            ExitCode::FAILURE
        }
    }
}

/// One line per error chain. Causes whose text the outer message already
/// embeds are skipped.
fn error_report(e: &anyhow::Error) -> String {
    let mut report = String::new();
    for cause in e.chain() {
        let text = cause.to_string();
        if report.contains(&text) {
            continue;
        }
        if !report.is_empty() {
            report.push_str(": ");
        }
        report.push_str(&text);
    }
    report
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(&config::default_config_path())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let command = cli.command.unwrap_or(Commands::Browse);
    let level = if cli.verbose { LevelFilter::Debug } else { config.log_level()? };
    let log_config = LogConfig::new(config.log_path.clone())
        .with_level(level)
        .with_terminal(!matches!(command, Commands::Browse));
    init_logging(&log_config)?;

    let manager = RecordManager::open(config.store_config())
        .with_context(|| format!("cannot open record store at {}", config.db_path.display()))?;
    let manager = Arc::new(manager);

    let result = dispatch(command, &manager, &config);

    match Arc::try_unwrap(manager) {
        Ok(manager) => manager.close(),
        Err(manager) => manager.flush(),
    }
    result
}

fn dispatch(command: Commands, manager: &Arc<RecordManager>, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Browse => browse(manager, config),
        Commands::List { filter, json, reveal } => list(manager, filter.as_deref(), json, reveal),
        Commands::Add { app, user, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password()?,
            };
            let record = manager.add(&app, &user, &password)?;
            println!("Added {} ({})", record.app_name, record.id.short());
            Ok(())
        }
        Commands::Edit { id, app, user, password } => {
            let record = find(manager, &id)?;
            let password = match password {
                Some(Some(p)) => p,
                Some(None) => prompt_password()?,
                None => record.password.clone(),
            };
            let updated = manager.update(
                &record,
                app.as_deref().unwrap_or(&record.app_name),
                user.as_deref().unwrap_or(&record.user_name),
                &password,
            )?;
            println!("Updated {} ({})", updated.app_name, updated.id.short());
            Ok(())
        }
        Commands::Show { id } => set_visibility(manager, &id, true),
        Commands::Hide { id } => set_visibility(manager, &id, false),
        Commands::Copy { id } => copy(manager, config, &id),
        Commands::Delete { id } => {
            let record = find(manager, &id)?;
            manager.delete(&record);
            match manager.get(&record.id) {
                Err(StoreError::NotFound(_)) => {
                    println!("Deleted {} ({})", record.app_name, record.id.short());
                    Ok(())
                }
                _ => bail!("could not delete {} ({})", record.app_name, record.id.short()),
            }
        }
    }
}

fn find(manager: &RecordManager, id: &str) -> Result<Record> {
    manager
        .find_by_prefix(id)
        .with_context(|| format!("no single record matches '{}'", id))
}

fn prompt_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ").context("could not read password")?;
    if password.is_empty() {
        bail!("password cannot be empty");
    }
    Ok(password)
}

fn list(manager: &RecordManager, filter: Option<&str>, json: bool, reveal: bool) -> Result<()> {
    let mut records = manager.fetch(filter)?;
    for (row, record) in records.iter_mut().enumerate() {
        if !reveal {
            record.password = PasswordCell::for_record(row, record).display_text();
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No records");
        return Ok(());
    }
    for record in &records {
        println!(
            "{}  {:<24} {:<28} {}",
            record.id.short(),
            record.app_name,
            record.user_name,
            record.password
        );
    }
    Ok(())
}

fn set_visibility(manager: &RecordManager, id: &str, visible: bool) -> Result<()> {
    let record = find(manager, id)?;
    manager.set_visibility(&record, visible);

    let stored = manager.get(&record.id)?;
    if stored.is_password_visible != visible {
        bail!("could not save visibility for {}", record.id.short());
    }
    println!(
        "{} ({}) is now {}",
        record.app_name,
        record.id.short(),
        if visible { "shown" } else { "hidden" }
    );
    Ok(())
}

fn copy(manager: &RecordManager, config: &AppConfig, id: &str) -> Result<()> {
    let record = find(manager, id)?;
    let cell = PasswordCell::for_record(0, &record);
    if !cell.is_visible() {
        bail!(
            "password for {} is hidden; run `password-manager show {}` first",
            record.app_name,
            record.id.short()
        );
    }

    let clipboard = SystemClipboard::new(config.clipboard_timeout());
    let worker = clipboard.spawn_copy(cell.visible_text());
    match clipboard.clear_after() {
        Some(timeout) => println!(
            "Copied password for {}; clipboard clears in {}s",
            record.app_name,
            timeout.as_secs()
        ),
        None => println!("Copied password for {}", record.app_name),
    }
    worker.join().map_err(|_| anyhow!("clipboard worker panicked"))
}

fn browse(manager: &Arc<RecordManager>, config: &AppConfig) -> Result<()> {
    let clipboard = Arc::new(SystemClipboard::new(config.clipboard_timeout()));
    let mut app = App::new(Arc::clone(manager), clipboard.clone())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Timed clears die with the process, so do them now
    if clipboard.clear_pending() {
        println!("Cleared copied password from the clipboard");
    }
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if app.handle_key_event(key)? {
                    break;
                }
            }
        }

        if app.should_quit {
            break;
        }

        app.drain_events();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_report_names_each_cause_once() {
        let store = StoreError::Read(rusqlite::Error::QueryReturnedNoRows);
        let e = anyhow::Error::new(store).context("cannot list records");

        let report = error_report(&e);

        assert_eq!(report.matches("Query returned no rows").count(), 1);
        assert!(report.starts_with("cannot list records: Store read failed"));
    }

    #[test]
    fn test_error_report_keeps_distinct_causes() {
        let e = anyhow!("inner failure").context("outer step");
        assert_eq!(error_report(&e), "outer step: inner failure");
    }
}
