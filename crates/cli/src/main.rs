mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use roster_sync::{DegradedMode, DEFAULT_UPCOMING_COUNT};
use time::Date;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Staff roster synchronization.
#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Synchronize monthly staff rosters from a scheduling source"
)]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronize one employee's month and print the result
    Sync {
        #[command(flatten)]
        month: MonthArgs,
        #[command(flatten)]
        source: SourceArgs,
        /// JSON store file; an in-memory store is used when absent
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Print a month's roster, synchronizing it first if it has no days
    Show {
        #[command(flatten)]
        month: MonthArgs,
        #[command(flatten)]
        source: SourceArgs,
        /// JSON store file
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// List the next working shifts of an employee
    Upcoming {
        #[arg(long)]
        employee: String,
        /// JSON store file
        #[arg(long)]
        store: Option<PathBuf>,
        /// First date to consider (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_date)]
        from: Option<Date>,
        #[arg(long, default_value_t = DEFAULT_UPCOMING_COUNT)]
        count: usize,
    },

    /// Publish a draft roster
    Publish {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        roster_id: u64,
        /// JSON store file
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Print a synthetic month as the scheduling API would return it
    Mock {
        #[command(flatten)]
        month: MonthArgs,
        /// Seed for a reproducible dataset
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
pub(crate) struct MonthArgs {
    #[arg(long)]
    pub employee: String,
    #[arg(long)]
    pub year: i32,
    #[arg(long)]
    pub month: u32,
}

#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Read the month from a JSON file instead of the scheduling API
    #[arg(long)]
    pub source_file: Option<PathBuf>,
    /// Fallback when the source fails: off, random or seeded:<n>
    #[arg(long)]
    pub degraded: Option<DegradedMode>,
    /// Fetch timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

fn parse_date(text: &str) -> Result<Date, String> {
    roster_core::serde_fmt::parse_date(text).map_err(|e| format!("invalid date '{}': {}", text, e))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ROSTER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    };

    let result = rt.block_on(async {
        match cli.command {
            Commands::Sync {
                month,
                source,
                store,
            } => commands::sync::cmd_sync(&settings, &month, &source, store.as_deref()).await,
            Commands::Show {
                month,
                source,
                store,
            } => commands::show::cmd_show(&settings, &month, &source, store.as_deref()).await,
            Commands::Upcoming {
                employee,
                store,
                from,
                count,
            } => {
                commands::upcoming::cmd_upcoming(&settings, &employee, store.as_deref(), from, count)
                    .await
            }
            Commands::Publish {
                employee,
                roster_id,
                store,
            } => {
                commands::publish::cmd_publish(&settings, &employee, roster_id, store.as_deref())
                    .await
            }
            Commands::Mock { month, seed } => commands::mock::cmd_mock(&month, seed),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
