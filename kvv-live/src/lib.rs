//! Client library for the KVV live departure monitor.
//!
//! Resolves stops by name, coordinates or id, and fetches upcoming
//! departures with their ad-hoc time strings decoded into absolute
//! timestamps.

pub mod domain;
pub mod kvv;
