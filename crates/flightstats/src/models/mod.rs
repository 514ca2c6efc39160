pub mod airport;
pub mod delay;
pub mod envelope;

use serde_json::{Value, json};

pub use airport::AirportCoordinate;
pub use delay::{DelayKey, DelayStatistic};
pub use envelope::{
    ENVELOPE_SCHEMA_VERSION, EnvelopeCommandFailure, EnvelopeNotice, NO_DATA_WARNING,
    ResponseEnvelope,
};

use crate::geometry::RouteGeometry;

/// JSON schemas for the typed output shapes, keyed by shape name.
pub fn output_schemas() -> Value {
    json!({
        "airport_coordinate": schema_value(schemars::schema_for!(AirportCoordinate)),
        "delay_statistic": schema_value(schemars::schema_for!(DelayStatistic)),
        "route_geometry": schema_value(schemars::schema_for!(RouteGeometry)),
    })
}

fn schema_value(schema: schemars::Schema) -> Value {
    match serde_json::to_value(schema) {
        Ok(value) => value,
        Err(error) => {
            panic!("failed to serialize generated output schema: {error}");
        }
    }
}
