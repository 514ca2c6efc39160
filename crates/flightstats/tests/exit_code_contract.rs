mod common;

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

use common::{build_database, standard_fixture, temp_db_path};

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_NOT_FOUND: i32 = 3;
const EXIT_USAGE_ERROR: i32 = 64;

fn flightstats(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flightstats"))
        .arg("--db")
        .arg(db)
        .args(["--home-dir", "/tmp", "--log-level", "error"])
        .args(args)
        .output()
        .expect("command should execute")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be one JSON envelope")
}

#[test]
fn missing_required_args_exits_with_usage_code() {
    let status = Command::new(env!("CARGO_BIN_EXE_flightstats"))
        .arg("flight")
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_USAGE_ERROR));
}

#[test]
fn invalid_boundary_input_exits_with_usage_code() {
    let db = temp_db_path("exit-usage");
    for args in [["flight", "0"], ["airport", "J1K"], ["date", "2015-01-05"]] {
        let output = flightstats(&db, &args);
        assert_eq!(output.status.code(), Some(EXIT_USAGE_ERROR), "{args:?}");
    }
}

#[test]
fn missing_database_exits_with_runtime_code() {
    let output = flightstats(&temp_db_path("exit-missing-db"), &["stats", "airline"]);

    assert_eq!(output.status.code(), Some(EXIT_RUNTIME_FAILURE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "stderr: {stderr}");
}

#[test]
fn unknown_flight_exits_with_not_found_code() {
    let db = build_database("exit-not-found", &standard_fixture());
    let output = flightstats(&db, &["flight", "999999"]);

    assert_eq!(output.status.code(), Some(EXIT_NOT_FOUND));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("flight_not_found"), "stderr: {stderr}");
}

#[test]
fn found_flight_prints_envelope() {
    let db = build_database("exit-found", &standard_fixture());
    let output = flightstats(&db, &["flight", "5"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let envelope = stdout_json(&output);
    assert_eq!(envelope["ok"], true);
    assert_eq!(envelope["command"], "flight");
    assert_eq!(envelope["data"]["flights"][0]["FLIGHT_ID"], 5);
    assert_eq!(envelope["data"]["flights"][0]["AIRLINE_NAME"], "AA");
}

#[test]
fn text_listing_prints_count_header() {
    let db = build_database("exit-text", &standard_fixture());
    let output = flightstats(&db, &["airline", "Delta Air Lines Inc.", "--text"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(
        lines,
        vec![
            "Found 2 results:",
            "9. ATL -> ECP by Delta Air Lines Inc., Delay: 45 Minutes",
            "10. JFK -> ATL by Delta Air Lines Inc., Delay: 12 Minutes",
        ]
    );
}

#[test]
fn empty_statistics_succeed_with_no_data_warning() {
    let db = build_database("exit-empty", &common::Fixture::default());
    let output = flightstats(&db, &["stats", "route"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let envelope = stdout_json(&output);
    assert_eq!(envelope["command"], "stats.route");
    assert_eq!(envelope["meta"]["row_count"], 0);
    assert_eq!(envelope["warnings"][0]["code"], "no_data");
}

#[test]
fn routes_filter_by_severity_and_count_panels() {
    let db = build_database("exit-routes", &standard_fixture());
    let output = flightstats(&db, &["routes", "--severity", "moderate"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let envelope = stdout_json(&output);
    assert_eq!(envelope["command"], "routes");
    assert_eq!(envelope["meta"]["row_count"], 2);

    let routes = envelope["data"]["routes"]
        .as_array()
        .expect("routes should be an array");
    let pairs = routes
        .iter()
        .map(|route| {
            (
                route["origin"]["IATA"].as_str().unwrap_or_default(),
                route["destination"]["IATA"].as_str().unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(pairs, vec![("JFK", "LAX"), ("ORD", "ATL")]);
    assert!(routes.iter().all(|route| route["severity"] == "moderate"));
    assert!(routes.iter().all(|route| route["geometry"]["type"] == "LineString"));

    let panels = &envelope["meta"]["panels"];
    assert_eq!(panels["26-50% Delay"]["route_count"], 2);
    assert_eq!(panels["26-50% Delay"]["color"], "#FF6347");
    assert_eq!(panels["76-100% Delay"]["route_count"], 0);
    assert_eq!(panels["0-25% Delay"]["route_count"], 0);
}

#[test]
fn routes_geojson_prints_feature_collection() {
    let db = build_database("exit-geojson", &standard_fixture());
    let output = flightstats(&db, &["routes", "--geojson"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let collection = stdout_json(&output);
    assert_eq!(collection["type"], "FeatureCollection");
    let features = collection["features"]
        .as_array()
        .expect("features should be an array");
    assert_eq!(features.len(), 3);
    assert!(
        features
            .iter()
            .all(|feature| feature["geometry"]["type"] == "LineString")
    );
}

#[test]
fn airports_lists_only_valid_coordinates() {
    let db = build_database("exit-airports", &standard_fixture());
    let output = flightstats(&db, &["airports"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let envelope = stdout_json(&output);
    assert_eq!(envelope["command"], "airports");
    let codes = envelope["data"]["airports"]
        .as_array()
        .expect("airports should be an array")
        .iter()
        .map(|airport| airport["IATA"].as_str().unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(codes, vec!["ATL", "JFK", "LAX", "ORD"]);
}

#[test]
fn schema_needs_no_database() {
    let output = flightstats(&temp_db_path("exit-schema"), &["schema"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let envelope = stdout_json(&output);
    assert_eq!(envelope["ok"], true);
}
