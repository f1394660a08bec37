//! KVV live departure API client.
//!
//! This module talks to the webapp backend of the KVV departure monitor
//! (`https://live.kvv.de/webapp/`). Key characteristics of the service:
//!
//! - Every request carries a static `key` query parameter; there is no
//!   other authentication.
//! - Departure times come in three textual forms ("sofort", "<N> min",
//!   "H:MM") plus a bare "0" that means "sofort"; see `domain::normalize`.
//! - Empty results are sent as payloads without the expected array key,
//!   not as empty arrays.
//! - The service is pure request/response: no push updates, and ids are
//!   stable so results can be requeried at any time.

mod client;
mod convert;
mod error;
mod mock;
mod transport;
mod types;

pub use client::{DEFAULT_MAX_INFOS, KvvClient, KvvConfig};
pub use convert::{ConvertError, departure_from_record, stop_from_record};
pub use error::KvvError;
pub use mock::MockTransport;
pub use transport::{HttpTransport, Transport, TransportFailure};
pub use types::{DepartureRecord, DeparturesPayload, StopRecord, StopsPayload};
