//! fx-hud: forex session tracker for the trading journal.
//!
//! ## Subcommands
//!
//! - `status`: One snapshot of every session (table or JSON)
//! - `watch`: Headless loop printing status changes and coaching prompts
//! - `tui`: Terminal session tracker with timed coaching prompts

mod error;
mod logging;
mod status;
mod tui;
mod watch;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use fx_session_core::{load_config, RuntimeConfig, SessionEngine, SessionTable};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::logging::LogTarget;

#[derive(Parser)]
#[command(name = "fx-hud")]
#[command(about = "Forex session tracker")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.fx-hud/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// IANA timezone for local times, overriding the config file
    #[arg(long, global = true, value_name = "IANA")]
    timezone: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current status of every session
    Status {
        /// Evaluate at this instant instead of now (RFC 3339)
        #[arg(long, value_name = "RFC3339", value_parser = parse_instant)]
        at: Option<DateTime<Utc>>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run the session ticks and print prompts until Ctrl-C
    Watch,

    /// Interactive session tracker
    Tui,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("Invalid RFC 3339 timestamp {}: {}", value, err))
}

fn resolve_config(cli: &Cli) -> error::Result<RuntimeConfig> {
    let mut config = load_config(cli.config.clone())?;
    if let Some(timezone) = &cli.timezone {
        config.clock.viewer_timezone = Some(timezone.clone());
    }
    config.validate()?;
    Ok(config)
}

pub(crate) fn build_engine(config: &RuntimeConfig) -> error::Result<SessionEngine> {
    Ok(SessionEngine::new(SessionTable::standard(), config.viewer_zone()?))
}

fn log_target(command: &Commands) -> LogTarget {
    match command {
        Commands::Tui => LogTarget::File,
        _ => LogTarget::Stderr,
    }
}

fn run(cli: &Cli) -> error::Result<()> {
    let config = resolve_config(cli)?;
    match &cli.command {
        Commands::Status { at, json } => status::run(&config, *at, *json),
        Commands::Watch => watch::run(&config),
        Commands::Tui => tui::run(&config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logging = logging::init(log_target(&cli.command));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "fx-hud failed");
            // File logs are invisible to the user once the screen is gone.
            if logging.target() != LogTarget::Stderr {
                eprintln!("fx-hud: {}", err);
            }
            ExitCode::FAILURE
        }
    }
}
