//! Live API client error types.

use std::fmt;

use crate::domain::UnrecognizedTimeFormat;

use super::convert::ConvertError;
use super::transport::TransportFailure;

/// Errors from the live API client.
///
/// All variants are reported to the immediate caller of a client
/// operation; nothing is retried or recovered internally, and a failing
/// operation never returns a partial result list.
#[derive(Debug)]
pub enum KvvError {
    /// Network-level failure without an HTTP status (connect, DNS,
    /// timeout, cancellation)
    Transport(String),

    /// The service answered with a non-success HTTP status
    HttpStatus(u16),

    /// The response body was not the expected JSON shape
    Json { message: String },

    /// A decoded JSON element was missing a field or had the wrong shape
    MalformedRecord(String),

    /// A departure time string matched none of the known forms
    UnrecognizedTimeFormat(String),

    /// Client configuration is unusable (e.g. unparseable base URL)
    Config(String),
}

impl fmt::Display for KvvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KvvError::Transport(message) => write!(f, "transport error: {message}"),
            KvvError::HttpStatus(status) => match status {
                400 => f.write_str("invalid stop id or route"),
                404 => f.write_str("not found"),
                code => write!(f, "http error {code}"),
            },
            KvvError::Json { message } => write!(f, "JSON parse error: {message}"),
            KvvError::MalformedRecord(detail) => write!(f, "malformed record: {detail}"),
            KvvError::UnrecognizedTimeFormat(raw) => {
                write!(f, "unrecognized time format: {raw:?}")
            }
            KvvError::Config(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl std::error::Error for KvvError {}

impl From<TransportFailure> for KvvError {
    fn from(failure: TransportFailure) -> Self {
        match failure.status {
            Some(status) => KvvError::HttpStatus(status),
            None => KvvError::Transport(failure.message),
        }
    }
}

impl From<ConvertError> for KvvError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::MalformedRecord(detail) => KvvError::MalformedRecord(detail),
            ConvertError::Time(UnrecognizedTimeFormat(raw)) => {
                KvvError::UnrecognizedTimeFormat(raw)
            }
        }
    }
}
