use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use gridstate_lib::error::{ConfigError, DispatchError};
use gridstate_lib::prelude::*;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

/// Resolve grid options and replay slice dispatches.
#[derive(Debug, Parser)]
#[command(name = "gridstate", version)]
struct Cli {
    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the canonical configuration for an options file.
    Resolve {
        /// JSON options file.
        file: PathBuf,
    },
    /// Build a grid and apply dispatches, printing every pass.
    Simulate {
        /// JSON options file.
        file: PathBuf,

        /// Tagged slice value to dispatch, e.g.
        /// '{"slice":"globalFilter","value":"acme"}'. Repeatable.
        #[arg(long = "dispatch", value_name = "JSON")]
        dispatches: Vec<String>,

        /// Act as the owning caller for this slice: take its change
        /// notifications and supply the value back on the next pass.
        #[arg(long = "controlled", value_name = "SLICE")]
        controlled: Vec<SliceName>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid dispatch value: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("failed to set up logging: {0}")]
    Log(String),
}

fn init_logging(cli: &Cli) -> Result<(), CliError> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| CliError::Log(e.to_string()))?;
            WriteLogger::init(level, Config::default(), file)
        }
        None => TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    }
    .map_err(|e| CliError::Log(e.to_string()))
}

fn resolve(file: &Path) -> Result<(), CliError> {
    let options = GridOptions::from_path(file)?;
    let config = options.resolve(&Defaults::builtin());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn print_pass(pass: usize, grid: &Grid, bindings: &GridBindings) -> Result<(), CliError> {
    let report = serde_json::json!({
        "pass": pass,
        "revision": grid.store().revision(),
        "slices": bindings.snapshot(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn simulate(file: &Path, dispatches: &[String], controlled: &[SliceName]) -> Result<(), CliError> {
    let mut options = GridOptions::from_path(file)?;

    let notified: Arc<Mutex<Vec<SliceValue>>> = Arc::new(Mutex::new(Vec::new()));
    for name in controlled {
        let notified = Arc::clone(&notified);
        options.options.callbacks.set_tagged(
            *name,
            OnChange::new(move |value| {
                if let Ok(mut guard) = notified.lock() {
                    guard.push(value);
                }
            }),
        );
    }

    let grid = Grid::new(&options);
    print_pass(0, &grid, &grid.bind(&options))?;

    for (i, raw) in dispatches.iter().enumerate() {
        let value: SliceValue = serde_json::from_str(raw)?;
        log::info!("dispatching {}", value.name());
        grid.bind(&options).dispatch_value(value)?;

        // Feed notified values back, as an owning caller would on re-render.
        let pending: Vec<_> = notified
            .lock()
            .map(|mut guard| guard.drain(..).collect())
            .unwrap_or_default();
        for value in pending {
            options.supply(value);
        }

        print_pass(i + 1, &grid, &grid.bind(&options))?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(&cli)?;
    match &cli.command {
        Command::Resolve { file } => resolve(file),
        Command::Simulate {
            file,
            dispatches,
            controlled,
        } => simulate(file, dispatches, controlled),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
