use schemars::JsonSchema;
use serde::Serialize;

/// Grouping key of a [`DelayStatistic`]; the serialized field names are the ones downstream
/// consumers bind to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum DelayKey {
    Airline {
        #[serde(rename = "Airline")]
        airline: String,
    },
    Hour {
        #[serde(rename = "ScheduledHour")]
        hour: String,
    },
    Route {
        #[serde(rename = "ORIGIN_AIRPORT")]
        origin: String,
        #[serde(rename = "DESTINATION_AIRPORT")]
        destination: String,
    },
}

impl DelayKey {
    #[must_use]
    pub fn airline(airline: impl Into<String>) -> Self {
        Self::Airline {
            airline: airline.into(),
        }
    }

    #[must_use]
    pub fn hour(hour: impl Into<String>) -> Self {
        Self::Hour { hour: hour.into() }
    }

    #[must_use]
    pub fn route(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::Route {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DelayStatistic {
    #[serde(flatten)]
    pub key: DelayKey,

    #[serde(rename = "TotalFlights")]
    pub total_flights: u64,

    #[serde(rename = "DelayedFlights")]
    pub delayed_flights: u64,

    #[serde(rename = "Percentage_Delayed")]
    pub percentage_delayed: f64,
}
