#![allow(dead_code)]

use std::path::PathBuf;

use rusqlite::{Connection, params};

const FIXTURE_SCHEMA_SQL: &str = r#"
CREATE TABLE airlines (
    id INTEGER NOT NULL PRIMARY KEY,
    airline TEXT NOT NULL
);
CREATE TABLE airports (
    IATA_CODE TEXT NOT NULL PRIMARY KEY,
    AIRPORT TEXT,
    CITY TEXT,
    STATE TEXT,
    COUNTRY TEXT,
    LATITUDE TEXT,
    LONGITUDE TEXT
);
CREATE TABLE flights (
    ID INTEGER NOT NULL PRIMARY KEY,
    YEAR INTEGER NOT NULL,
    MONTH INTEGER NOT NULL,
    DAY INTEGER NOT NULL,
    AIRLINE INTEGER NOT NULL,
    FLIGHT_NUMBER INTEGER,
    TAIL_NUMBER TEXT,
    ORIGIN_AIRPORT TEXT NOT NULL,
    DESTINATION_AIRPORT TEXT NOT NULL,
    SCHEDULED_DEPARTURE TEXT,
    DEPARTURE_DELAY INTEGER
);
"#;

#[derive(Debug, Clone)]
pub struct FixtureFlight {
    pub id: i64,
    pub airline_id: i64,
    pub origin: &'static str,
    pub destination: &'static str,
    pub scheduled_departure: Option<&'static str>,
    pub departure_delay: Option<i64>,
    pub day: i64,
    pub month: i64,
    pub year: i64,
}

pub fn flight(
    id: i64,
    airline_id: i64,
    origin: &'static str,
    destination: &'static str,
    scheduled_departure: &'static str,
    departure_delay: Option<i64>,
) -> FixtureFlight {
    FixtureFlight {
        id,
        airline_id,
        origin,
        destination,
        scheduled_departure: Some(scheduled_departure),
        departure_delay,
        day: 1,
        month: 1,
        year: 2015,
    }
}

#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub airlines: Vec<(i64, &'static str)>,
    pub airports: Vec<(&'static str, &'static str, &'static str)>,
    pub flights: Vec<FixtureFlight>,
}

pub fn temp_db_path(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("flightstats-{label}-{nanos}.sqlite3"))
}

pub fn build_database(label: &str, fixture: &Fixture) -> PathBuf {
    let path = temp_db_path(label);
    let mut connection = Connection::open(&path).expect("fixture database should open");
    connection
        .execute_batch(FIXTURE_SCHEMA_SQL)
        .expect("fixture schema should apply");

    let tx = connection
        .transaction()
        .expect("fixture transaction should open");
    for (id, name) in &fixture.airlines {
        tx.execute(
            "INSERT INTO airlines (id, airline) VALUES (?1, ?2)",
            params![id, name],
        )
        .expect("airline row should insert");
    }
    for (code, latitude, longitude) in &fixture.airports {
        tx.execute(
            "INSERT INTO airports (IATA_CODE, AIRPORT, LATITUDE, LONGITUDE) VALUES (?1, ?2, ?3, ?4)",
            params![code, format!("{code} International"), latitude, longitude],
        )
        .expect("airport row should insert");
    }
    for flight in &fixture.flights {
        tx.execute(
            "INSERT INTO flights (
                ID, YEAR, MONTH, DAY, AIRLINE, FLIGHT_NUMBER, TAIL_NUMBER,
                ORIGIN_AIRPORT, DESTINATION_AIRPORT, SCHEDULED_DEPARTURE, DEPARTURE_DELAY
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                flight.id,
                flight.year,
                flight.month,
                flight.day,
                flight.airline_id,
                flight.id + 100,
                format!("N{}", flight.id),
                flight.origin,
                flight.destination,
                flight.scheduled_departure,
                flight.departure_delay,
            ],
        )
        .expect("flight row should insert");
    }
    tx.commit().expect("fixture transaction should commit");

    path
}

/// Small dataset shared by the operation tests.
///
/// Airlines: 1 "AA", 2 "Delta Air Lines Inc.", 3 "XX". Airport "ECP" has blank coordinates and
/// "UST" has a garbage longitude.
pub fn standard_fixture() -> Fixture {
    let mut flights = vec![
        flight(5, 1, "JFK", "LAX", "0805", Some(30)),
        flight(6, 1, "JFK", "LAX", "0810", Some(0)),
        flight(7, 1, "LAX", "JFK", "1730", Some(-5)),
        flight(8, 2, "ATL", "JFK", "0615", None),
        flight(9, 2, "ATL", "ECP", "0620", Some(45)),
        flight(10, 2, "JFK", "ATL", "2359", Some(12)),
    ];
    // XX: 10 flights, 3 of them delayed.
    for offset in 0..10 {
        let delay = if offset < 3 { Some(15 + offset) } else { Some(-1) };
        flights.push(flight(100 + offset, 3, "ORD", "ATL", "1200", delay));
    }
    flights[3].day = 2;
    flights[4].day = 2;

    Fixture {
        airlines: vec![(1, "AA"), (2, "Delta Air Lines Inc."), (3, "XX")],
        airports: vec![
            ("ATL", "33.64044", "-84.42694"),
            ("ECP", "", ""),
            ("JFK", "40.63975", "-73.77893"),
            ("LAX", "33.94254", "-118.40807"),
            ("ORD", "41.9796", "-87.90446"),
            ("UST", "29.9544", "not-a-number"),
        ],
        flights,
    }
}
