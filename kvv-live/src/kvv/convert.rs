//! Conversion from wire records to domain types.
//!
//! This is the decode boundary: every JSON element coming back from the
//! service passes through here exactly once, and anything that does not
//! match the expected shape is rejected with a precise error instead of
//! surfacing as a missing-field fault deeper in the crate.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::{Departure, Stop, UnrecognizedTimeFormat, normalize};

use super::types::{DepartureRecord, StopRecord};

/// Error during record to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// A record is missing a required field or has the wrong shape
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A departure time string matched none of the known forms
    #[error(transparent)]
    Time(#[from] UnrecognizedTimeFormat),
}

/// Build a [`Stop`] from one decoded JSON element.
pub fn stop_from_record(record: &Value) -> Result<Stop, ConvertError> {
    let record: StopRecord = serde_json::from_value(record.clone())
        .map_err(|e| ConvertError::MalformedRecord(e.to_string()))?;

    if record.id.is_empty() {
        return Err(ConvertError::MalformedRecord(
            "stop id must not be empty".to_string(),
        ));
    }

    Ok(Stop {
        name: record.name,
        stop_id: record.id,
        lat: record.lat,
        lon: record.lon,
    })
}

/// Build a [`Departure`] from one decoded JSON element, resolving its time
/// string against `now`.
pub fn departure_from_record(record: &Value, now: NaiveDateTime) -> Result<Departure, ConvertError> {
    let record: DepartureRecord = serde_json::from_value(record.clone())
        .map_err(|e| ConvertError::MalformedRecord(e.to_string()))?;

    // The service sends a bare "0" for a vehicle leaving right now; its
    // display form is "sofort".
    let raw_time = if record.time == "0" {
        "sofort".to_string()
    } else {
        record.time
    };

    let resolved_time = normalize(&raw_time, now)?;

    Ok(Departure {
        route: record.route,
        destination: record.destination,
        direction: record.direction,
        raw_time,
        resolved_time,
        low_floor: record.lowfloor,
        realtime: record.realtime,
        traction: record.traction,
        stop_position: record.stop_position,
    })
}
