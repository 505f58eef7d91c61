//! # Varr CLI
//!
//! Command-line harness for the varr-math evaluators. Builds any function family,
//! measures its accuracy against libm and times each evaluation mode.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{LevelFilter, Log, Metadata, Record};

mod commands;

use commands::accuracy::AccuracyArgs;
use commands::timing::TimingArgs;

/// Accuracy and timing harness for table-lookup function approximations
#[derive(Parser)]
#[command(name = "varr")]
#[command(about = "Accuracy and timing harness for varr-math evaluators")]
#[command(version)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure the worst weighted relative difference against libm
    Accuracy(AccuracyArgs),

    /// Compare wall-clock time against libm in each evaluation mode
    Timing(TimingArgs),

    /// List the available functions with their default domains
    List,
}

/// Writes enabled records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    log::set_logger(&LOGGER).context("Failed to install logger")?;
    log::set_max_level(level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Accuracy(args) => commands::accuracy::execute(args),
        Commands::Timing(args) => commands::timing::execute(args),
        Commands::List => commands::list::execute(),
    }
}
