use std::cmp::Ordering;

use rusqlite::types::Value as SqlValue;
use tracing::warn;

use crate::catalog::ResultSet;
use crate::models::{DelayKey, DelayStatistic};
use crate::normalize::text_of;

pub const DIMENSION_KEY_COLUMN: &str = "dimension_key";
pub const ORIGIN_COLUMN: &str = "origin_airport";
pub const DESTINATION_COLUMN: &str = "destination_airport";
pub const TOTAL_FLIGHTS_COLUMN: &str = "total_flights";
pub const DELAYED_FLIGHTS_COLUMN: &str = "delayed_flights";

/// Per-group counts as produced by the grouping templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelayTally {
    pub total: u64,
    pub delayed: u64,
}

impl DelayTally {
    #[must_use]
    pub fn new(total: u64, delayed: u64) -> Self {
        Self { total, delayed }
    }

    /// `None` for an empty group or counts that contradict each other.
    #[must_use]
    pub fn percentage(self) -> Option<f64> {
        (self.total > 0 && self.delayed <= self.total)
            .then(|| delay_percentage(self.delayed, self.total))
    }
}

/// `round(delayed * 100 / total, 2)`, half away from zero. `total` must be non-zero.
#[must_use]
pub fn delay_percentage(delayed: u64, total: u64) -> f64 {
    let raw = delayed as f64 * 100.0 / total as f64;
    (raw * 100.0).round() / 100.0
}

/// Mirror of the SQL predicate for callers holding a decoded delay value.
#[must_use]
pub fn is_delayed(departure_delay: Option<i64>) -> bool {
    departure_delay.is_some_and(|minutes| minutes > 0)
}

#[must_use]
pub fn statistic(key: DelayKey, tally: DelayTally) -> Option<DelayStatistic> {
    let percentage_delayed = tally.percentage()?;
    Some(DelayStatistic {
        key,
        total_flights: tally.total,
        delayed_flights: tally.delayed,
        percentage_delayed,
    })
}

/// Carrier statistics, highest delay percentage first; ties break on carrier name.
#[must_use]
pub fn carrier_statistics(result: &ResultSet) -> Vec<DelayStatistic> {
    let mut statistics = collect_statistics(result, |result, values| {
        let index = result.column_index(DIMENSION_KEY_COLUMN)?;
        Some(DelayKey::airline(text_of(&values[index]).unwrap_or_default()))
    });
    statistics.sort_by(compare_by_percentage_desc);
    statistics
}

/// Hour-bucket statistics in ascending bucket order. The bucket is the two-character prefix of
/// the scheduled departure, compared as a string.
#[must_use]
pub fn hour_statistics(result: &ResultSet) -> Vec<DelayStatistic> {
    let mut statistics = collect_statistics(result, |result, values| {
        let index = result.column_index(DIMENSION_KEY_COLUMN)?;
        Some(DelayKey::hour(text_of(&values[index]).unwrap_or_default()))
    });
    statistics.sort_by(|left, right| left.key.cmp(&right.key));
    statistics
}

/// Route statistics ordered by origin, then destination. A→B and B→A stay distinct.
#[must_use]
pub fn route_statistics(result: &ResultSet) -> Vec<DelayStatistic> {
    let mut statistics = collect_statistics(result, |result, values| {
        let origin = result.column_index(ORIGIN_COLUMN)?;
        let destination = result.column_index(DESTINATION_COLUMN)?;
        Some(DelayKey::route(
            text_of(&values[origin]).unwrap_or_default(),
            text_of(&values[destination]).unwrap_or_default(),
        ))
    });
    statistics.sort_by(|left, right| left.key.cmp(&right.key));
    statistics
}

#[must_use]
pub fn compare_by_percentage_desc(left: &DelayStatistic, right: &DelayStatistic) -> Ordering {
    right
        .percentage_delayed
        .total_cmp(&left.percentage_delayed)
        .then_with(|| left.key.cmp(&right.key))
}

fn collect_statistics(
    result: &ResultSet,
    key_of: impl Fn(&ResultSet, &[SqlValue]) -> Option<DelayKey>,
) -> Vec<DelayStatistic> {
    let (Some(total_index), Some(delayed_index)) = (
        result.column_index(TOTAL_FLIGHTS_COLUMN),
        result.column_index(DELAYED_FLIGHTS_COLUMN),
    ) else {
        if !result.is_empty() {
            warn!(columns = ?result.columns, "grouping rows lack tally columns");
        }
        return Vec::new();
    };

    let mut statistics = Vec::with_capacity(result.len());
    for values in &result.rows {
        let Some(key) = key_of(result, values) else {
            warn!(columns = ?result.columns, "grouping rows lack dimension key columns");
            return Vec::new();
        };
        let tally = match (count_of(&values[total_index]), count_of(&values[delayed_index])) {
            (Some(total), Some(delayed)) => DelayTally::new(total, delayed),
            _ => {
                warn!(?key, "non-integer tally for delay group; skipping");
                continue;
            }
        };
        match statistic(key, tally) {
            Some(statistic) => statistics.push(statistic),
            None => warn!(
                total = tally.total,
                delayed = tally.delayed,
                "inconsistent tally for delay group; skipping"
            ),
        }
    }

    statistics
}

fn count_of(value: &SqlValue) -> Option<u64> {
    match value {
        SqlValue::Integer(count) => u64::try_from(*count).ok(),
        _ => None,
    }
}
