//! Error types for the object driver.
//!
//! # Design
//! Each failure class a round trip can hit gets its own variant so typed
//! callers can tell "no matching record" apart from "server error" apart from
//! "malformed response". The compatibility wrappers on `ObjectDriver` collapse
//! all of them back to the historical defaults.

use thiserror::Error;

/// Errors returned by the typed (`try_*`) driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The transport could not complete the request. `code` is the
    /// transport's own non-zero code, never an HTTP status.
    #[error("transport failure (code {code}): {message}")]
    Transport { code: u32, message: String },

    /// The server answered with a status other than 200.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body is not valid JSON.
    #[error("response is not valid JSON: {0}")]
    Decode(String),

    /// The JSON parsed but does not have the envelope the action expects.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(&'static str),

    /// `resultSets` was present but held no rows.
    #[error("result set is empty")]
    NoRows,

    /// `resultCode` was present but is not an integer.
    #[error("resultCode is not an integer: {0:?}")]
    InvalidResultCode(String),

    /// The driver's transport has already been released by `close`.
    #[error("driver is closed")]
    Closed,

    /// Configuration could not be assembled.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DriverError {
    /// The raw code reported by the historical `(code, head, body)` call:
    /// the transport code on transport failures, otherwise the HTTP status.
    pub fn raw_code(&self) -> i64 {
        match self {
            DriverError::Transport { code, .. } => i64::from(*code),
            DriverError::HttpStatus { status, .. } => i64::from(*status),
            _ => -1,
        }
    }
}

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;
