//! Boundary checks applied before any operation runs. The core assumes its inputs already passed
//! these.

use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use regex::Regex;
use time::Date;
use time::macros::format_description;

pub const IATA_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub field: &'static str,
    pub message: String,
}

impl ValidationFailure {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationFailure {}

/// Day, month and year of a calendar date that is known to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightDate {
    pub day: u8,
    pub month: u8,
    pub year: i32,
}

pub fn parse_flight_id(raw: &str) -> Result<i64, ValidationFailure> {
    let flight_id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationFailure::new("flight id", "must be a positive integer"))?;
    if flight_id <= 0 {
        return Err(ValidationFailure::new(
            "flight id",
            "must be a positive integer",
        ));
    }
    Ok(flight_id)
}

/// Accepts three ASCII letters in any case and returns them upper-cased.
pub fn parse_iata_code(raw: &str) -> Result<String, ValidationFailure> {
    let trimmed = raw.trim();
    if !iata_pattern().is_match(trimmed) {
        return Err(ValidationFailure::new(
            "IATA code",
            format!("must be {IATA_LENGTH} letters"),
        ));
    }
    Ok(trimmed.to_ascii_uppercase())
}

pub fn parse_carrier_name(raw: &str) -> Result<String, ValidationFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::new("airline", "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Parses `DD/MM/YYYY`; single-digit day and month are accepted, impossible dates are not.
pub fn parse_flight_date(raw: &str) -> Result<FlightDate, ValidationFailure> {
    let format = format_description!("[day padding:none]/[month padding:none]/[year]");
    let date = Date::parse(raw.trim(), format)
        .map_err(|error| ValidationFailure::new("date", format!("use DD/MM/YYYY ({error})")))?;
    Ok(FlightDate {
        day: date.day(),
        month: u8::from(date.month()),
        year: date.year(),
    })
}

fn iata_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| match Regex::new(r"^[A-Za-z]{3}$") {
        Ok(pattern) => pattern,
        Err(error) => panic!("IATA pattern must compile: {error}"),
    })
}
