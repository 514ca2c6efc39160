#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind;
use flightstats::FlightData;
use flightstats::cli::app::{Cli, Command, RuntimeArgs};
use flightstats::cli::commands;
use flightstats::config::{ConfigOverrides, DB_PATH_ENV, LOG_FILTER_ENV, RuntimeConfig};
use flightstats::models::EnvelopeCommandFailure;
use tracing::{error, info};

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_NOT_FOUND: i32 = 3;
const EXIT_USAGE_ERROR: i32 = 64;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };

    let config = match resolve_runtime_config(&cli.runtime) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("flightstats: {error:#}");
            return EXIT_RUNTIME_FAILURE;
        }
    };
    if let Err(error) = flightstats::logging::init(&config.log_filter) {
        eprintln!("flightstats: {error:#}");
        return EXIT_RUNTIME_FAILURE;
    }

    let command_name = cli.command.name();
    info!(command = command_name, db = %config.db_path.display(), "starting");

    match execute(cli.command, &config) {
        Ok(()) => {
            info!(command = command_name, exit_code = EXIT_SUCCESS, "completed");
            EXIT_SUCCESS
        }
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            error!(command = command_name, exit_code, "failed");
            eprintln!("{error:#}");
            exit_code
        }
    }
}

fn execute(command: Command, config: &RuntimeConfig) -> Result<()> {
    if let Command::Schema = command {
        return commands::schema::run();
    }

    let data = FlightData::connect(&config.db_path)?;
    match command {
        Command::Flight(args) => commands::flights::run_flight(&args, &data),
        Command::Date(args) => commands::flights::run_date(&args, &data),
        Command::Airline(args) => commands::flights::run_airline(&args, &data),
        Command::Airport(args) => commands::flights::run_airport(&args, &data),
        Command::Stats(args) => commands::stats::run(&args, &data),
        Command::Airports => commands::airports::run(&data),
        Command::Routes(args) => commands::routes::run(&args, &data),
        Command::Schema => commands::schema::run(),
    }
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<EnvelopeCommandFailure>() {
        Some(failure) if failure.error_code() == Some(commands::flights::FLIGHT_NOT_FOUND_CODE) => {
            EXIT_NOT_FOUND
        }
        _ => EXIT_RUNTIME_FAILURE,
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

fn resolve_runtime_config(args: &RuntimeArgs) -> Result<RuntimeConfig> {
    let home_dir = match &args.home_dir {
        Some(path) => path.clone(),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("HOME is not set; pass --home-dir"))?,
    };

    let cwd = match &args.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    let overrides = ConfigOverrides {
        db_path: args
            .db
            .clone()
            .or_else(|| std::env::var_os(DB_PATH_ENV).map(PathBuf::from)),
        log_filter: args
            .log_level
            .clone()
            .or_else(|| std::env::var(LOG_FILTER_ENV).ok()),
    };

    flightstats::config::resolve_runtime_config(&home_dir, &cwd, &overrides)
}
