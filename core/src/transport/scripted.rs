use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Transport, TransportError, CODE_FAILED};
use crate::http::HttpResponse;

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Result<HttpResponse, TransportError>>,
    requests: Vec<String>,
    closed: bool,
}

/// A transport that answers from a queue of canned replies.
///
/// Clones share the same queue and request log, so a test can keep one
/// handle while the driver owns another. Requests made after the queue runs
/// dry fail with `CODE_FAILED`.
///
/// # Example
/// ```
/// use object_driver::{Endpoint, ObjectDriver, ScriptedTransport};
///
/// let transport = ScriptedTransport::new()
///     .with_reply(200, r#"{"resultCode":"0","resultMsg":"ok"}"#);
/// let driver = ObjectDriver::new(Endpoint::new("http://x/", ".json"), transport.clone());
/// let (code, _, _) = driver.perform_request("http://x/Widget.json?_action=List");
/// assert_eq!(code, 200);
/// assert_eq!(transport.requests().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body.
    pub fn with_reply(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queue a full response.
    pub fn with_response(self, response: HttpResponse) -> Self {
        self.push(Ok(response));
        self
    }

    /// Queue a transport-level failure.
    pub fn with_failure(self, code: u32, message: &str) -> Self {
        self.push(Err(TransportError::new(code, message)));
        self
    }

    pub fn push(&self, reply: Result<HttpResponse, TransportError>) {
        self.lock().replies.push_back(reply);
    }

    /// Every URL requested so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<String> {
        self.lock().requests.last().cloned()
    }

    /// Replies still waiting in the queue.
    pub fn pending(&self) -> usize {
        self.lock().replies.len()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        // A panicking test thread must not hide the log from the others.
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for ScriptedTransport {
    fn perform(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut script = self.lock();
        script.requests.push(url.to_string());
        script
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new(CODE_FAILED, "no scripted reply left")))
    }

    fn close(&mut self) {
        self.lock().closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_are_served_in_order_and_requests_logged() {
        let mut transport = ScriptedTransport::new()
            .with_reply(200, "first")
            .with_failure(7, "refused");
        let handle = transport.clone();

        let first = transport.perform("http://x/a").unwrap();
        assert_eq!(first.body, "first");
        let second = transport.perform("http://x/b").unwrap_err();
        assert_eq!(second.code, 7);
        let third = transport.perform("http://x/c").unwrap_err();
        assert_eq!(third.code, CODE_FAILED);

        assert_eq!(handle.requests(), vec!["http://x/a", "http://x/b", "http://x/c"]);
        assert_eq!(handle.pending(), 0);
    }

    #[test]
    fn close_is_visible_through_clones() {
        let mut transport = ScriptedTransport::new();
        let handle = transport.clone();
        assert!(!handle.is_closed());
        transport.close();
        assert!(handle.is_closed());
    }
}
