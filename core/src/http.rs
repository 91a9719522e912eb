//! HTTP request and response values for the host-does-IO split.
//!
//! # Design
//! Requests and responses are plain data. `Endpoint` builds `HttpRequest`
//! values and the `response` module parses `HttpResponse` values without
//! touching the network; a `Transport` sits between the two. Every request of
//! this protocol is a GET whose whole payload lives in the query string, so a
//! request is just its URL plus the action it carries.

use crate::action::Action;

/// An HTTP GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub action: Action,
    pub url: String,
}

/// An HTTP response described as plain data.
///
/// Constructed by a `Transport` after executing an `HttpRequest`, then
/// handed to the `response::parse_*` functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A response with no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Headers rendered back into `Name: value` lines.
    pub fn header_text(&self) -> String {
        self.headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}\r\n"))
            .collect()
    }
}
