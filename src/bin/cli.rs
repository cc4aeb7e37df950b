//! snapdb - interactive shell

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, EnvFilter};

use snapdb::config::{ShellConfig, DEFAULT_LOG_FILTER};
use snapdb::{ExecutionEngine, QueryResult};

/// Print welcome banner
fn print_banner() {
    println!(
        r#"
 snapdb - an in-memory relational engine with snapshot transactions
 Type '.help' for help, '.quit' to exit
"#
    );
}

/// Print help message
fn print_help() {
    println!(
        r#"
Commands:
  .help              Show this help message
  .quit              Exit snapdb
  .tables            List all tables
  .schema [table]    Show table schema
  .save [file]       Save all tables to a JSON file
  .load [file]       Replace all tables with a JSON file

SQL Commands (one per line):
  CREATE TABLE ...   Create a new table
  DROP TABLE ...     Drop a table
  ALTER TABLE ...    ADD / DROP / MODIFY COLUMN
  INSERT INTO ...    Insert a row
  SELECT ...         Query data
  UPDATE ...         Update rows
  DELETE FROM ...    Delete rows
  BEGIN / COMMIT / ROLLBACK

Examples:
  CREATE TABLE users (id INTEGER, name TEXT);
  INSERT INTO users VALUES (1, 'Alice');
  SELECT * FROM users WHERE id = 1;
"#
    );
}

/// Initialise logging from `--log`, then `RUST_LOG`, then the default
fn init_logging(config: &ShellConfig) -> Result<()> {
    let filter = match &config.log_filter {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter '{}'", directive))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Print a statement result
fn print_result(result: &QueryResult, delimiter: &str) {
    println!("{}", result.render(delimiter));
    if let Some(warning) = result.warning() {
        eprintln!("Warning: {}", warning);
    }
}

/// Handle special dot commands; returns false when the shell should exit
fn handle_special_command(cmd: &str, engine: &mut ExecutionEngine, config: &ShellConfig) -> bool {
    let parts: Vec<&str> = cmd.split_whitespace().collect();

    match parts.first().copied() {
        Some(".help") => print_help(),
        Some(".quit") | Some(".exit") => return false,
        Some(".tables") => {
            let tables = engine.store().table_names();
            if tables.is_empty() {
                println!("No tables found.");
            } else {
                println!("Tables:");
                for table in tables {
                    println!("  {}", table);
                }
            }
        }
        Some(".schema") => {
            let names = match parts.get(1) {
                Some(name) => vec![name.to_string()],
                None => engine.store().table_names(),
            };
            for name in names {
                match engine.store().describe_table(&name) {
                    Ok(info) => println!("{}", info),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
        }
        Some(command @ (".save" | ".load")) => {
            let path = parts
                .get(1)
                .map(std::path::PathBuf::from)
                .or_else(|| config.data_file.clone());
            let Some(path) = path else {
                eprintln!("Usage: {} <file>", command);
                return true;
            };
            let (outcome, verb) = if command == ".save" {
                (engine.save(&path), "Saved")
            } else {
                (engine.load(&path), "Loaded")
            };
            match outcome {
                Ok(()) => println!("{} {}", verb, path.display()),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Type '.help' for available commands.");
        }
        None => {}
    }
    true
}

/// Load the configured data file if it exists
fn open_engine(config: &ShellConfig) -> Result<ExecutionEngine> {
    let mut engine = ExecutionEngine::new();
    if let Some(path) = config.data_file.as_ref().filter(|p| p.exists()) {
        engine
            .load(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        debug!(path = %path.display(), "data file loaded");
    }
    Ok(engine)
}

/// Save to the configured data file on exit
fn close_engine(engine: &mut ExecutionEngine, config: &ShellConfig) -> Result<()> {
    let Some(path) = &config.data_file else {
        return Ok(());
    };
    if engine.in_transaction() {
        warn!("open transaction rolled back on exit");
        engine.execute_sql("ROLLBACK")?;
    }
    engine
        .save(path)
        .with_context(|| format!("failed to save {}", path.display()))
}

/// Main REPL loop
fn run_repl(config: &ShellConfig) -> Result<()> {
    let mut engine = open_engine(config)?;
    let mut editor = DefaultEditor::new()?;
    if let Some(history) = &config.history_file {
        if editor.load_history(history).is_err() {
            debug!(path = %history.display(), "no previous history");
        }
    }

    print_banner();

    loop {
        let line = match editor.readline(&config.prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        editor.add_history_entry(trimmed)?;

        if trimmed.starts_with('.') {
            if !handle_special_command(trimmed, &mut engine, config) {
                break;
            }
            continue;
        }

        let lowered = trimmed.trim_end_matches(';').to_ascii_lowercase();
        if lowered == "exit" || lowered == "quit" {
            break;
        }

        match engine.execute_sql(trimmed) {
            Ok(result) => print_result(&result, &config.delimiter),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    if let Some(history) = &config.history_file {
        editor.save_history(history)?;
    }
    close_engine(&mut engine, config)?;
    println!("Goodbye!");
    Ok(())
}

fn main() -> Result<()> {
    let config = ShellConfig::from_args(std::env::args().skip(1))?;
    init_logging(&config)?;
    run_repl(&config)
}
