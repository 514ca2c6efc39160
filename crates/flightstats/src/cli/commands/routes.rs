use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value, json};

use crate::flights::FlightData;
use crate::geometry::{RouteGeometry, SeverityBucket, feature_collection, partition_by_severity};
use crate::models::ResponseEnvelope;

#[derive(Debug, Clone, Args)]
pub struct RoutesArgs {
    /// Print a GeoJSON FeatureCollection instead of the response envelope.
    #[arg(long, default_value_t = false)]
    pub geojson: bool,

    /// Keep only routes in one bucket: low, moderate, high or severe.
    #[arg(long, value_name = "BUCKET", value_parser = parse_severity)]
    pub severity: Option<SeverityBucket>,
}

pub fn run(args: &RoutesArgs, data: &FlightData) -> Result<()> {
    let geometries = data
        .route_geometries()
        .into_iter()
        .filter(|geometry| args.severity.is_none_or(|bucket| geometry.severity == bucket))
        .collect::<Vec<_>>();

    if args.geojson {
        let encoded = serde_json::to_string(&feature_collection(&geometries))
            .context("failed to encode route feature collection")?;
        println!("{encoded}");
        return Ok(());
    }

    let panels = panel_summary(&geometries);
    let items = super::to_values(&geometries)?;
    super::emit(&ResponseEnvelope::sequence("routes", "routes", items).with_meta("panels", panels))
}

/// Route count and color per severity panel, keyed by panel title.
#[must_use]
pub fn panel_summary(geometries: &[RouteGeometry]) -> Value {
    let panels = partition_by_severity(geometries)
        .into_iter()
        .map(|(bucket, routes)| {
            (
                bucket.label().to_string(),
                json!({
                    "severity": bucket.key(),
                    "color": bucket.color(),
                    "route_count": routes.len(),
                }),
            )
        })
        .collect::<Map<_, _>>();
    Value::Object(panels)
}

fn parse_severity(raw: &str) -> Result<SeverityBucket, String> {
    SeverityBucket::from_key(&raw.trim().to_ascii_lowercase())
        .ok_or_else(|| format!("unknown severity `{raw}` (expected low, moderate, high or severe)"))
}
