use anyhow::Result;

use crate::flights::FlightData;
use crate::models::ResponseEnvelope;

pub fn run(data: &FlightData) -> Result<()> {
    let airports = data.airport_coordinates();
    let items = super::to_values(&airports)?;
    super::emit(&ResponseEnvelope::sequence("airports", "airports", items))
}
