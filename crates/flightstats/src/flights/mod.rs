use std::path::Path;

use anyhow::Result;
use tracing::{debug, error};

use crate::aggregate;
use crate::catalog::{self, QueryId, QueryParams, ResultSet};
use crate::geometry::{self, RouteGeometry};
use crate::models::{AirportCoordinate, DelayStatistic};
use crate::normalize::{self, Row};
use crate::sqlite::FlightStore;

/// The public operations over the flight database.
///
/// Every operation acquires its own connection and runs exactly one catalog template. Execution
/// failures are logged with the operation name and parameters and come back as an empty result,
/// so "no rows" and "query failed" look the same to the caller. [`FlightData::execute`] is the
/// strict path that keeps the error.
#[derive(Debug, Clone)]
pub struct FlightData {
    store: FlightStore,
}

impl FlightData {
    /// Opens the store at `path`; failure here is a startup failure.
    pub fn connect(path: &Path) -> Result<Self> {
        Ok(Self::new(FlightStore::open(path)?))
    }

    #[must_use]
    pub fn new(store: FlightStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &FlightStore {
        &self.store
    }

    /// Runs one catalog template and surfaces any failure.
    pub fn execute(&self, query: QueryId, params: &QueryParams) -> Result<ResultSet> {
        let connection = self.store.acquire()?;
        let result = catalog::execute(&connection, query, params)?;
        debug!(operation = query.name(), rows = result.len(), "query executed");
        Ok(result)
    }

    pub fn get_flight_by_id(&self, flight_id: i64) -> Option<Row> {
        let params = QueryParams::new().with(":id", flight_id);
        let result = self.fetch(QueryId::FlightById, &params);
        normalize::rows_to_mappings(&result).into_iter().next()
    }

    pub fn delayed_flights_by_airline(&self, airline: &str) -> Vec<Row> {
        let params = QueryParams::new().with(":airline", airline.to_string());
        normalize::rows_to_mappings(&self.fetch(QueryId::DelayedFlightsByAirline, &params))
    }

    pub fn delayed_flights_by_airport(&self, airport: &str) -> Vec<Row> {
        let params = QueryParams::new().with(":airport", airport.to_string());
        normalize::rows_to_mappings(&self.fetch(QueryId::DelayedFlightsByAirport, &params))
    }

    pub fn flights_by_date(&self, day: u8, month: u8, year: i32) -> Vec<Row> {
        let params = QueryParams::new()
            .with(":day", i64::from(day))
            .with(":month", i64::from(month))
            .with(":year", i64::from(year));
        normalize::rows_to_mappings(&self.fetch(QueryId::FlightsByDate, &params))
    }

    pub fn delay_percentage_by_airline(&self) -> Vec<DelayStatistic> {
        aggregate::carrier_statistics(&self.fetch(QueryId::DelayByAirline, &QueryParams::new()))
    }

    pub fn delay_percentage_by_hour(&self) -> Vec<DelayStatistic> {
        aggregate::hour_statistics(&self.fetch(QueryId::DelayByHour, &QueryParams::new()))
    }

    pub fn delay_percentage_by_route(&self) -> Vec<DelayStatistic> {
        aggregate::route_statistics(&self.fetch(QueryId::DelayByRoute, &QueryParams::new()))
    }

    pub fn airport_coordinates(&self) -> Vec<AirportCoordinate> {
        normalize::airport_coordinates(
            &self.fetch(QueryId::AirportCoordinates, &QueryParams::new()),
        )
    }

    /// Route statistics joined with airport coordinates; built fresh on every call.
    pub fn route_geometries(&self) -> Vec<RouteGeometry> {
        let statistics = self.delay_percentage_by_route();
        if statistics.is_empty() {
            return Vec::new();
        }
        let airports = self.airport_coordinates();
        geometry::build_route_geometries(&statistics, &airports)
    }

    fn fetch(&self, query: QueryId, params: &QueryParams) -> ResultSet {
        match self.execute(query, params) {
            Ok(result) => result,
            Err(cause) => {
                error!(
                    operation = query.name(),
                    params = %params,
                    error = %format!("{cause:#}"),
                    "query execution failed; returning empty result"
                );
                ResultSet::default()
            }
        }
    }
}
