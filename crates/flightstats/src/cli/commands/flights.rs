use anyhow::{Error, Result};
use clap::Args;
use serde_json::{Value, json};
use tracing::warn;

use crate::aggregate::is_delayed;
use crate::flights::FlightData;
use crate::models::{EnvelopeCommandFailure, ResponseEnvelope};
use crate::normalize::Row;
use crate::validate::{
    FlightDate, parse_carrier_name, parse_flight_date, parse_flight_id, parse_iata_code,
};

pub const FLIGHT_NOT_FOUND_CODE: &str = "flight_not_found";

#[derive(Debug, Clone, Args)]
pub struct FlightArgs {
    #[arg(value_name = "ID", value_parser = parse_flight_id)]
    pub id: i64,

    #[arg(long, default_value_t = false)]
    pub text: bool,
}

#[derive(Debug, Clone, Args)]
pub struct DateArgs {
    #[arg(value_name = "DD/MM/YYYY", value_parser = parse_flight_date)]
    pub date: FlightDate,

    #[arg(long, default_value_t = false)]
    pub text: bool,
}

#[derive(Debug, Clone, Args)]
pub struct AirlineArgs {
    #[arg(value_name = "NAME", value_parser = parse_carrier_name)]
    pub airline: String,

    #[arg(long, default_value_t = false)]
    pub text: bool,
}

#[derive(Debug, Clone, Args)]
pub struct AirportArgs {
    #[arg(value_name = "IATA", value_parser = parse_iata_code)]
    pub airport: String,

    #[arg(long, default_value_t = false)]
    pub text: bool,
}

pub fn run_flight(args: &FlightArgs, data: &FlightData) -> Result<()> {
    let Some(flight) = data.get_flight_by_id(args.id) else {
        let envelope = ResponseEnvelope::error("flight", FLIGHT_NOT_FOUND_CODE, "flight not found")
            .with_error_details(json!({ "flight_id": args.id }));
        return Err(Error::new(EnvelopeCommandFailure::new(envelope)));
    };

    emit_flights("flight", vec![flight], args.text)
}

pub fn run_date(args: &DateArgs, data: &FlightData) -> Result<()> {
    let FlightDate { day, month, year } = args.date;
    emit_flights("date", data.flights_by_date(day, month, year), args.text)
}

pub fn run_airline(args: &AirlineArgs, data: &FlightData) -> Result<()> {
    emit_flights(
        "airline",
        data.delayed_flights_by_airline(&args.airline),
        args.text,
    )
}

pub fn run_airport(args: &AirportArgs, data: &FlightData) -> Result<()> {
    emit_flights(
        "airport",
        data.delayed_flights_by_airport(&args.airport),
        args.text,
    )
}

fn emit_flights(command: &str, flights: Vec<Row>, text: bool) -> Result<()> {
    if text {
        for line in render_flight_lines(&flights) {
            println!("{line}");
        }
        return Ok(());
    }

    let items = flights.into_iter().map(Value::Object).collect();
    super::emit(&ResponseEnvelope::sequence(command, "flights", items))
}

/// Plain-text listing: a count header, then one line per flight. Rows missing a field the line
/// needs are logged and skipped.
#[must_use]
pub fn render_flight_lines(flights: &[Row]) -> Vec<String> {
    if flights.is_empty() {
        return vec!["No results found.".to_string()];
    }

    let mut lines = vec![format!("Found {} results:", flights.len())];
    for flight in flights {
        match format_flight_line(flight) {
            Some(line) => lines.push(line),
            None => warn!(
                flight_id = ?flight.get("ID"),
                "flight row lacks fields needed for text output; skipping"
            ),
        }
    }
    lines
}

fn format_flight_line(flight: &Row) -> Option<String> {
    let id = flight.get("ID")?.as_i64()?;
    let origin = flight.get("ORIGIN_AIRPORT")?.as_str()?;
    let destination = flight.get("DESTINATION_AIRPORT")?.as_str()?;
    let airline = flight.get("AIRLINE_NAME")?.as_str()?;
    let delay = flight.get("DELAY").and_then(Value::as_i64);

    let mut line = format!("{id}. {origin} -> {destination} by {airline}");
    if let Some(minutes) = delay.filter(|minutes| is_delayed(Some(*minutes))) {
        line.push_str(&format!(", Delay: {minutes} Minutes"));
    }
    Some(line)
}
