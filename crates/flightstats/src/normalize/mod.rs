use rusqlite::types::Value as SqlValue;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::catalog::ResultSet;
use crate::models::AirportCoordinate;

pub const IATA_CODE_COLUMN: &str = "IATA_CODE";
pub const LATITUDE_COLUMN: &str = "LATITUDE";
pub const LONGITUDE_COLUMN: &str = "LONGITUDE";

/// A result row exposed as a mapping from stored column name to JSON value.
pub type Row = Map<String, Value>;

#[must_use]
pub fn rows_to_mappings(result: &ResultSet) -> Vec<Row> {
    result
        .rows
        .iter()
        .map(|values| {
            result
                .columns
                .iter()
                .zip(values)
                .map(|(column, value)| (column.clone(), json_value_from_sql(value)))
                .collect::<Row>()
        })
        .collect()
}

/// Builds the coordinate catalog. Rows whose code is missing or whose latitude or longitude is
/// not a finite number are dropped, one warning per drop.
#[must_use]
pub fn airport_coordinates(result: &ResultSet) -> Vec<AirportCoordinate> {
    let (Some(code_index), Some(latitude_index), Some(longitude_index)) = (
        result.column_index(IATA_CODE_COLUMN),
        result.column_index(LATITUDE_COLUMN),
        result.column_index(LONGITUDE_COLUMN),
    ) else {
        if !result.is_empty() {
            warn!(columns = ?result.columns, "airport rows lack coordinate columns");
        }
        return Vec::new();
    };

    let mut airports = Vec::with_capacity(result.len());
    for values in &result.rows {
        let code = text_of(&values[code_index]);
        let latitude = parse_coordinate(&values[latitude_index]);
        let longitude = parse_coordinate(&values[longitude_index]);

        match (code, latitude, longitude) {
            (Some(iata), Some(latitude), Some(longitude)) => airports.push(AirportCoordinate {
                iata,
                latitude,
                longitude,
            }),
            (code, _, _) => warn!(
                iata = code.as_deref().unwrap_or("<missing>"),
                latitude = %display_sql(&values[latitude_index]),
                longitude = %display_sql(&values[longitude_index]),
                "invalid coordinates for airport; dropping"
            ),
        }
    }

    airports
}

/// Parses a stored coordinate; only finite numbers are accepted.
#[must_use]
pub fn parse_coordinate(value: &SqlValue) -> Option<f64> {
    let parsed = match value {
        SqlValue::Real(value) => *value,
        SqlValue::Integer(value) => *value as f64,
        SqlValue::Text(text) => text.trim().parse::<f64>().ok()?,
        SqlValue::Null | SqlValue::Blob(_) => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Reads a text cell; integer cells are rendered the way SQLite casts them.
#[must_use]
pub fn text_of(value: &SqlValue) -> Option<String> {
    match value {
        SqlValue::Text(text) => Some(text.clone()),
        SqlValue::Integer(value) => Some(value.to_string()),
        SqlValue::Real(value) => Some(value.to_string()),
        SqlValue::Null | SqlValue::Blob(_) => None,
    }
}

#[must_use]
pub fn json_value_from_sql(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(value) => json!(value),
        SqlValue::Real(value) => json!(value),
        SqlValue::Text(value) => json!(value),
        SqlValue::Blob(value) => json!(encode_blob_hex(value)),
    }
}

fn display_sql(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "null".to_string(),
        SqlValue::Text(text) => format!("{text:?}"),
        other => json_value_from_sql(other).to_string(),
    }
}

fn encode_blob_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        output.push(HEX[(byte >> 4) as usize] as char);
        output.push(HEX[(byte & 0x0f) as usize] as char);
    }
    output
}
