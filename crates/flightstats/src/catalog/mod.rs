use std::fmt::{Display, Formatter};

use anyhow::{Context, Result, bail};
use rusqlite::types::{ToSql, Value as SqlValue};
use rusqlite::Connection;

// Every template that filters or counts delays expands this fragment, so the "delayed" predicate
// cannot drift between dimensions.
macro_rules! delayed_predicate {
    () => {
        "flights.DEPARTURE_DELAY > 0"
    };
}

macro_rules! delayed_count {
    () => {
        concat!(
            "SUM(CASE WHEN ",
            delayed_predicate!(),
            " THEN 1 ELSE 0 END)"
        )
    };
}

macro_rules! flight_listing {
    () => {
        r#"
SELECT
    flights.*,
    airlines.airline AS AIRLINE_NAME,
    flights.DEPARTURE_DELAY AS DELAY
FROM flights
JOIN airlines ON flights.AIRLINE = airlines.id
"#
    };
}

pub const DELAYED_PREDICATE_SQL: &str = delayed_predicate!();

const FLIGHT_BY_ID_SQL: &str = r#"
SELECT
    flights.*,
    airlines.airline AS AIRLINE_NAME,
    flights.ID AS FLIGHT_ID,
    flights.DEPARTURE_DELAY AS DELAY
FROM flights
JOIN airlines ON flights.AIRLINE = airlines.id
WHERE flights.ID = :id
"#;

const DELAYED_FLIGHTS_BY_AIRLINE_SQL: &str = concat!(
    flight_listing!(),
    "WHERE airlines.airline = :airline AND ",
    delayed_predicate!(),
    "\nORDER BY flights.ID\n"
);

const DELAYED_FLIGHTS_BY_AIRPORT_SQL: &str = concat!(
    flight_listing!(),
    "WHERE flights.ORIGIN_AIRPORT = :airport AND ",
    delayed_predicate!(),
    "\nORDER BY flights.ID\n"
);

const FLIGHTS_BY_DATE_SQL: &str = concat!(
    flight_listing!(),
    "WHERE flights.DAY = :day AND flights.MONTH = :month AND flights.YEAR = :year\n",
    "ORDER BY flights.ID\n"
);

const DELAY_BY_AIRLINE_SQL: &str = concat!(
    "SELECT\n",
    "    airlines.airline AS dimension_key,\n",
    "    COUNT(*) AS total_flights,\n    ",
    delayed_count!(),
    " AS delayed_flights\n",
    "FROM flights\n",
    "JOIN airlines ON flights.AIRLINE = airlines.id\n",
    "GROUP BY airlines.airline\n",
    "ORDER BY airlines.airline\n"
);

const DELAY_BY_HOUR_SQL: &str = concat!(
    "SELECT\n",
    "    COALESCE(substr(flights.SCHEDULED_DEPARTURE, 1, 2), '') AS dimension_key,\n",
    "    COUNT(*) AS total_flights,\n    ",
    delayed_count!(),
    " AS delayed_flights\n",
    "FROM flights\n",
    "GROUP BY dimension_key\n",
    "ORDER BY dimension_key\n"
);

const DELAY_BY_ROUTE_SQL: &str = concat!(
    "SELECT\n",
    "    flights.ORIGIN_AIRPORT AS origin_airport,\n",
    "    flights.DESTINATION_AIRPORT AS destination_airport,\n",
    "    COUNT(*) AS total_flights,\n    ",
    delayed_count!(),
    " AS delayed_flights\n",
    "FROM flights\n",
    "GROUP BY flights.ORIGIN_AIRPORT, flights.DESTINATION_AIRPORT\n",
    "ORDER BY flights.ORIGIN_AIRPORT, flights.DESTINATION_AIRPORT\n"
);

const AIRPORT_COORDINATES_SQL: &str = r#"
SELECT IATA_CODE, LATITUDE, LONGITUDE
FROM airports
ORDER BY IATA_CODE
"#;

/// One entry per analytic question. The set is closed: callers pick a template, they never
/// supply SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryId {
    FlightById,
    DelayedFlightsByAirline,
    DelayedFlightsByAirport,
    FlightsByDate,
    DelayByAirline,
    DelayByHour,
    DelayByRoute,
    AirportCoordinates,
}

impl QueryId {
    pub const ALL: [Self; 8] = [
        Self::FlightById,
        Self::DelayedFlightsByAirline,
        Self::DelayedFlightsByAirport,
        Self::FlightsByDate,
        Self::DelayByAirline,
        Self::DelayByHour,
        Self::DelayByRoute,
        Self::AirportCoordinates,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FlightById => "flight_by_id",
            Self::DelayedFlightsByAirline => "delayed_flights_by_airline",
            Self::DelayedFlightsByAirport => "delayed_flights_by_airport",
            Self::FlightsByDate => "flights_by_date",
            Self::DelayByAirline => "delayed_by_airline",
            Self::DelayByHour => "delayed_by_hour",
            Self::DelayByRoute => "delayed_by_route",
            Self::AirportCoordinates => "airport_coordinates",
        }
    }

    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Self::FlightById => FLIGHT_BY_ID_SQL,
            Self::DelayedFlightsByAirline => DELAYED_FLIGHTS_BY_AIRLINE_SQL,
            Self::DelayedFlightsByAirport => DELAYED_FLIGHTS_BY_AIRPORT_SQL,
            Self::FlightsByDate => FLIGHTS_BY_DATE_SQL,
            Self::DelayByAirline => DELAY_BY_AIRLINE_SQL,
            Self::DelayByHour => DELAY_BY_HOUR_SQL,
            Self::DelayByRoute => DELAY_BY_ROUTE_SQL,
            Self::AirportCoordinates => AIRPORT_COORDINATES_SQL,
        }
    }

    /// Named parameters the template binds, including the `:` prefix SQLite expects.
    #[must_use]
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Self::FlightById => &[":id"],
            Self::DelayedFlightsByAirline => &[":airline"],
            Self::DelayedFlightsByAirport => &[":airport"],
            Self::FlightsByDate => &[":day", ":month", ":year"],
            Self::DelayByAirline
            | Self::DelayByHour
            | Self::DelayByRoute
            | Self::AirportCoordinates => &[],
        }
    }

    /// Checks that `params` supplies exactly the names this template binds.
    pub fn check_params(self, params: &QueryParams) -> Result<()> {
        let expected = self.parameter_names();
        for name in expected {
            if params.get(name).is_none() {
                bail!("query `{}` is missing parameter `{name}`", self.name());
            }
        }
        for (index, (name, _)) in params.values.iter().enumerate() {
            if !expected.contains(name) {
                bail!("query `{}` does not accept parameter `{name}`", self.name());
            }
            if params.values[..index].iter().any(|(seen, _)| seen == name) {
                bail!("query `{}` received parameter `{name}` twice", self.name());
            }
        }
        Ok(())
    }
}

impl Display for QueryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Bound values for one template execution, keyed by `:name`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    values: Vec<(&'static str, SqlValue)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<SqlValue>) -> Self {
        self.values.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.values
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| value)
    }

    fn bindings(&self) -> Vec<(&str, &dyn ToSql)> {
        self.values
            .iter()
            .map(|(name, value)| (*name, value as &dyn ToSql))
            .collect()
    }
}

impl Display for QueryParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (index, (name, value)) in self.values.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            let name = name.trim_start_matches(':');
            match value {
                SqlValue::Null => write!(f, "{name}: null")?,
                SqlValue::Integer(value) => write!(f, "{name}: {value}")?,
                SqlValue::Real(value) => write!(f, "{name}: {value}")?,
                SqlValue::Text(value) => write!(f, "{name}: {value:?}")?,
                SqlValue::Blob(value) => write!(f, "{name}: blob:{} bytes", value.len())?,
            }
        }
        f.write_str("}")
    }
}

/// Raw rows from one template execution, column names in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl ResultSet {
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs one catalog template on `connection` with `params` bound by name.
pub fn execute(connection: &Connection, query: QueryId, params: &QueryParams) -> Result<ResultSet> {
    query.check_params(params)?;

    let mut statement = connection
        .prepare(query.sql())
        .with_context(|| format!("failed to prepare query `{query}`"))?;
    let columns = statement
        .column_names()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    let bindings = params.bindings();
    let mut rows = statement
        .query(bindings.as_slice())
        .with_context(|| format!("failed to execute query `{query}`"))?;

    let mut result_rows = Vec::new();
    while let Some(row) = rows
        .next()
        .with_context(|| format!("failed to fetch row for query `{query}`"))?
    {
        let mut values = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            let value = row
                .get::<usize, SqlValue>(index)
                .with_context(|| format!("failed to decode column {index} for query `{query}`"))?;
            values.push(value);
        }
        result_rows.push(values);
    }

    Ok(ResultSet {
        columns,
        rows: result_rows,
    })
}
