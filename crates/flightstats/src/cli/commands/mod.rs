pub mod airports;
pub mod flights;
pub mod routes;
pub mod schema;
pub mod stats;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::models::ResponseEnvelope;

pub(crate) fn emit(envelope: &ResponseEnvelope) -> Result<()> {
    let encoded = serde_json::to_string(envelope).context("failed to encode response envelope")?;
    println!("{encoded}");
    Ok(())
}

pub(crate) fn to_values<T: Serialize>(items: &[T]) -> Result<Vec<Value>> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).context("failed to encode result row"))
        .collect()
}
