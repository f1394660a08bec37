//! Live API response DTOs.
//!
//! These types map directly to the webapp JSON responses. The array keys
//! are `Option` because the service omits them entirely when it has
//! nothing to report; individual elements stay untyped `Value`s so the
//! conversion layer can fail per record with a useful message.

use serde::Deserialize;
use serde_json::Value;

/// Envelope for the `stops/byname` and `stops/bylatlon` responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StopsPayload {
    /// Matching stops; absent for an empty/placeholder response.
    pub stops: Option<Vec<Value>>,
}

/// Envelope for the `departures/bystop` and `departures/byroute` responses.
#[derive(Debug, Clone, Deserialize)]
pub struct DeparturesPayload {
    /// Upcoming departures; absent for an empty/placeholder response.
    pub departures: Option<Vec<Value>>,
}

/// A stop record as returned inside [`StopsPayload`] or, bare, by
/// `stops/bystop`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopRecord {
    /// Display name.
    pub name: String,

    /// Stable stop identifier.
    pub id: String,

    /// Latitude in degrees.
    pub lat: f64,

    /// Longitude in degrees.
    pub lon: f64,
}

/// One departure entry inside [`DeparturesPayload`].
#[derive(Debug, Clone, Deserialize)]
pub struct DepartureRecord {
    /// Line designator, e.g. "S1".
    pub route: String,

    /// Terminal display name.
    pub destination: String,

    /// Direction as free text.
    pub direction: String,

    /// Time string: "0", "sofort", "<N> min" or "H:MM".
    pub time: String,

    /// Accessibility flag.
    pub lowfloor: bool,

    /// True for live-tracked times, false for the static schedule.
    pub realtime: bool,

    /// Vehicle type.
    pub traction: String,

    /// Platform / stop position.
    #[serde(rename = "stopPosition")]
    pub stop_position: String,
}
