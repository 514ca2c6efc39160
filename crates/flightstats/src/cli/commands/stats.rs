use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::flights::FlightData;
use crate::models::{DelayStatistic, ResponseEnvelope};

#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
    #[arg(value_enum)]
    pub dimension: StatsDimension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsDimension {
    Airline,
    Hour,
    Route,
}

impl StatsDimension {
    fn command_name(self) -> &'static str {
        match self {
            Self::Airline => "stats.airline",
            Self::Hour => "stats.hour",
            Self::Route => "stats.route",
        }
    }
}

pub fn run(args: &StatsArgs, data: &FlightData) -> Result<()> {
    let statistics = collect(args.dimension, data);
    let items = super::to_values(&statistics)?;
    super::emit(&ResponseEnvelope::sequence(
        args.dimension.command_name(),
        "statistics",
        items,
    ))
}

#[must_use]
pub fn collect(dimension: StatsDimension, data: &FlightData) -> Vec<DelayStatistic> {
    match dimension {
        StatsDimension::Airline => data.delay_percentage_by_airline(),
        StatsDimension::Hour => data.delay_percentage_by_hour(),
        StatsDimension::Route => data.delay_percentage_by_route(),
    }
}
