//! Cadence command-line entry point

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use cadence_core::EngineConfig;
use cadence_shared::bootstrap::{init_env, init_tracing};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;
mod request;

use request::Request;

/// Cadence: expand recurring events into concrete occurrences
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(version, about, long_about = None)]
struct Args {
    /// Request file with `anchor` and `rule`; reads stdin when omitted
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Normalize the rule before validating: clear every other field of a NEVER
    /// rule and default a missing step to 1
    #[arg(long, global = true)]
    normalize: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print occurrences as JSON lines
    Expand {
        /// Maximum number of occurrences (default: CADENCE_DEFAULT_LIMIT)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Stop after this local start date (YYYY-MM-DD)
        #[arg(short, long)]
        through: Option<NaiveDate>,
    },
    /// Check the anchor and rule, printing `ok` or the rejection reason
    Validate,
    /// Print a prose description of the rule
    Describe,
}

fn main() -> Result<ExitCode> {
    init_env();

    // Flushes the JSON log file on drop
    let _guard = init_tracing("cadence");

    let args = Args::parse();
    let config = EngineConfig::from_env().context("Failed to load engine configuration")?;

    let mut request = Request::load(args.input.as_deref())?;
    if args.normalize {
        request = request.normalized();
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let code = match args.command {
        Command::Expand { limit, through } => {
            commands::expand(&request, &config, limit, through, &mut out)?;
            ExitCode::SUCCESS
        }
        Command::Validate => {
            if commands::validate(&request, &mut out)? {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Describe => {
            commands::describe(&request, &mut out)?;
            ExitCode::SUCCESS
        }
    };

    out.flush()?;
    Ok(code)
}
