//! The seam between the driver and the network.
//!
//! # Design
//! A `Transport` performs one GET for a fully built URL and reports either
//! the HTTP response as data or a transport-level failure with its own
//! non-zero code. HTTP error statuses are data, never transport errors, so
//! the driver can tell "could not reach the server" apart from "the server
//! said no". Codes follow libcurl numbering so they stay familiar in logs.

mod scripted;
#[cfg(feature = "ureq")]
mod ureq_agent;

use std::fmt;

use crate::error::DriverError;
use crate::http::HttpResponse;

pub use self::scripted::ScriptedTransport;
#[cfg(feature = "ureq")]
pub use self::ureq_agent::UreqTransport;

/// Catch-all transport failure.
pub const CODE_FAILED: u32 = 1;
/// The URL could not be used.
pub const CODE_MALFORMED_URL: u32 = 3;
/// The host name did not resolve.
pub const CODE_HOST_NOT_FOUND: u32 = 6;
/// The TCP connection could not be established.
pub const CODE_CONNECTION_FAILED: u32 = 7;
/// The request exceeded its deadline.
pub const CODE_TIMEOUT: u32 = 28;
/// Receiving the response failed part way.
pub const CODE_RECEIVE_FAILED: u32 = 56;

/// A failure below HTTP: nothing usable came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub code: u32,
    pub message: String,
}

impl TransportError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport code {}: {}", self.code, self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for DriverError {
    fn from(err: TransportError) -> Self {
        DriverError::Transport {
            code: err.code,
            message: err.message,
        }
    }
}

/// Performs blocking GET requests on behalf of an `ObjectDriver`.
///
/// A driver calls `perform` for one request at a time and calls `close`
/// exactly once when it releases the transport.
pub trait Transport: Send {
    fn perform(&mut self, url: &str) -> Result<HttpResponse, TransportError>;

    /// Release any held resources. Called once, by `ObjectDriver::close`.
    fn close(&mut self) {}
}
