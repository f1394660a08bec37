//! Stop value type.

use std::fmt;

/// A physical transit stop.
///
/// `stop_id` is the service's stable identifier and is used as the routing
/// key for departure queries. Values are only constructed by the decode
/// layer (`kvv::convert`), which guarantees a non-empty id; they are
/// read-only snapshots of a search response.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Display name of the stop.
    pub name: String,

    /// Stable, opaque identifier (e.g. "de:8212:3").
    pub stop_id: String,

    /// Latitude in degrees.
    pub lat: f64,

    /// Longitude in degrees.
    pub lon: f64,
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.stop_id)
    }
}
