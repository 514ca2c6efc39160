use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{
    flights::{AirlineArgs, AirportArgs, DateArgs, FlightArgs},
    routes::RoutesArgs,
    stats::StatsArgs,
};

#[derive(Debug, Parser)]
#[command(
    name = "flightstats",
    version,
    about = "Delay analytics over a historical flight-operations database"
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    /// SQLite database to read (defaults to $FLIGHTSTATS_DB, then data/flights.sqlite3).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    /// Log filter directive (defaults to $FLIGHTSTATS_LOG, then `info`).
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show one flight by id.
    Flight(FlightArgs),
    /// Show all flights on a date.
    Date(DateArgs),
    /// Show delayed flights of one airline.
    Airline(AirlineArgs),
    /// Show delayed flights departing one airport.
    Airport(AirportArgs),
    /// Delay percentages by airline, hour or route.
    Stats(StatsArgs),
    /// Airport coordinate catalog.
    Airports,
    /// Route lines classified by delay severity.
    Routes(RoutesArgs),
    /// JSON schemas of the typed output shapes.
    Schema,
}

impl Command {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flight(_) => "flight",
            Self::Date(_) => "date",
            Self::Airline(_) => "airline",
            Self::Airport(_) => "airport",
            Self::Stats(_) => "stats",
            Self::Airports => "airports",
            Self::Routes(_) => "routes",
            Self::Schema => "schema",
        }
    }
}
