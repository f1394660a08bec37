//! Domain types for the live departure client.
//!
//! These are the validated value types the rest of the crate works with.
//! They are constructed once from decoded wire records (see `kvv::convert`)
//! and immutable afterwards, so code that receives them can trust their
//! invariants.

mod departure;
mod stop;
mod time;

pub use departure::Departure;
pub use stop::Stop;
pub use time::{UnrecognizedTimeFormat, normalize};
