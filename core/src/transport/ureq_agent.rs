use std::io;
use std::time::Duration;

use super::{
    Transport, TransportError, CODE_CONNECTION_FAILED, CODE_FAILED, CODE_HOST_NOT_FOUND,
    CODE_MALFORMED_URL, CODE_RECEIVE_FAILED, CODE_TIMEOUT,
};
use crate::http::HttpResponse;

/// Blocking HTTP transport backed by a `ureq` agent.
///
/// Non-2xx statuses come back as data so the driver classifies them itself.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` bounds each whole request; `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn perform(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut response = self.agent.get(url).call().map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(CODE_RECEIVE_FAILED, e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify(err: ureq::Error) -> TransportError {
    let code = match &err {
        ureq::Error::HostNotFound => CODE_HOST_NOT_FOUND,
        ureq::Error::ConnectionFailed => CODE_CONNECTION_FAILED,
        ureq::Error::Timeout(_) => CODE_TIMEOUT,
        ureq::Error::BadUri(_) => CODE_MALFORMED_URL,
        ureq::Error::Io(io_err) => match io_err.kind() {
            io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => {
                CODE_CONNECTION_FAILED
            }
            io::ErrorKind::TimedOut => CODE_TIMEOUT,
            _ => CODE_FAILED,
        },
        _ => CODE_FAILED,
    };
    TransportError::new(code, err.to_string())
}
