use std::collections::BTreeMap;

use geo::LineString;
use schemars::JsonSchema;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use tracing::debug;

use crate::models::{AirportCoordinate, DelayKey, DelayStatistic};

/// Delay-severity strata for route rendering. Upper bounds are inclusive; a 0% route belongs to
/// none of them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBucket {
    Low,
    Moderate,
    High,
    Severe,
}

impl SeverityBucket {
    pub const ALL: [Self; 4] = [Self::Low, Self::Moderate, Self::High, Self::Severe];

    #[must_use]
    pub fn classify(percentage: f64) -> Option<Self> {
        if percentage.is_nan() || percentage <= 0.0 {
            None
        } else if percentage <= 25.0 {
            Some(Self::Low)
        } else if percentage <= 50.0 {
            Some(Self::Moderate)
        } else if percentage <= 75.0 {
            Some(Self::High)
        } else {
            Some(Self::Severe)
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Severe => "severe",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.key() == key)
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#FFCCCB",
            Self::Moderate => "#FF6347",
            Self::High => "#DC143C",
            Self::Severe => "#8B0000",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "0-25% Delay",
            Self::Moderate => "26-50% Delay",
            Self::High => "51-75% Delay",
            Self::Severe => "76-100% Delay",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RouteGeometry {
    pub origin: AirportCoordinate,
    pub destination: AirportCoordinate,
    pub statistic: DelayStatistic,
    pub severity: SeverityBucket,
    pub color: &'static str,

    /// Two points, origin then destination, in (longitude, latitude) order. Serialized as a
    /// GeoJSON `LineString` under `geometry`.
    #[serde(rename = "geometry", serialize_with = "serialize_line")]
    #[schemars(with = "LineGeometry")]
    pub line: LineString<f64>,
}

/// GeoJSON geometry object for a route line.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct LineGeometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: Vec<[f64; 2]>,
}

impl LineGeometry {
    #[must_use]
    pub fn from_line(line: &LineString<f64>) -> Self {
        Self {
            kind: "LineString",
            coordinates: line.coords().map(|coord| [coord.x, coord.y]).collect(),
        }
    }
}

fn serialize_line<S: Serializer>(line: &LineString<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    LineGeometry::from_line(line).serialize(serializer)
}

/// Joins route statistics with the coordinate catalog. Routes missing either endpoint, routes
/// with a 0% delay rate, and non-route statistics are left out; input order is preserved.
#[must_use]
pub fn build_route_geometries(
    statistics: &[DelayStatistic],
    airports: &[AirportCoordinate],
) -> Vec<RouteGeometry> {
    let mut catalog: BTreeMap<&str, &AirportCoordinate> = BTreeMap::new();
    for airport in airports {
        catalog.entry(airport.iata.as_str()).or_insert(airport);
    }

    let mut geometries = Vec::new();
    for statistic in statistics {
        let DelayKey::Route {
            origin,
            destination,
        } = &statistic.key
        else {
            continue;
        };
        let (Some(origin_airport), Some(destination_airport)) = (
            catalog.get(origin.as_str()),
            catalog.get(destination.as_str()),
        ) else {
            debug!(%origin, %destination, "route endpoint lacks coordinates; omitting");
            continue;
        };
        let Some(severity) = SeverityBucket::classify(statistic.percentage_delayed) else {
            continue;
        };

        let line = LineString::from(vec![
            (origin_airport.longitude, origin_airport.latitude),
            (destination_airport.longitude, destination_airport.latitude),
        ]);
        geometries.push(RouteGeometry {
            origin: (*origin_airport).clone(),
            destination: (*destination_airport).clone(),
            statistic: statistic.clone(),
            severity,
            color: severity.color(),
            line,
        });
    }

    geometries
}

/// Groups geometries into one panel per severity bucket; every bucket is present.
#[must_use]
pub fn partition_by_severity(
    geometries: &[RouteGeometry],
) -> BTreeMap<SeverityBucket, Vec<&RouteGeometry>> {
    let mut panels = SeverityBucket::ALL
        .into_iter()
        .map(|bucket| (bucket, Vec::new()))
        .collect::<BTreeMap<_, _>>();
    for geometry in geometries {
        panels.entry(geometry.severity).or_default().push(geometry);
    }
    panels
}

/// GeoJSON `FeatureCollection` with one `LineString` feature per route.
#[must_use]
pub fn feature_collection(geometries: &[RouteGeometry]) -> Value {
    let features = geometries
        .iter()
        .map(|geometry| {
            json!({
                "type": "Feature",
                "geometry": LineGeometry::from_line(&geometry.line),
                "properties": {
                    "ORIGIN_AIRPORT": geometry.origin.iata,
                    "DESTINATION_AIRPORT": geometry.destination.iata,
                    "TotalFlights": geometry.statistic.total_flights,
                    "DelayedFlights": geometry.statistic.delayed_flights,
                    "Percentage_Delayed": geometry.statistic.percentage_delayed,
                    "severity": geometry.severity.key(),
                    "color": geometry.color,
                },
            })
        })
        .collect::<Vec<_>>();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}
