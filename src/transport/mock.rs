/*!
 * Mock transport for testing.
 *
 * Responses are scripted per URL. Each URL holds a queue of replies; replies are
 * consumed in order and the last one keeps answering once the queue is down to it.
 * Requests to unscripted URLs get a 404. Every request and every cookie set through
 * the `ConsentCookieStore` side is recorded for later assertions.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::TransportError;
use crate::transport::{ConsentCookieStore, HttpResponse, Transport};

/// A cookie recorded by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
}

/// A request recorded by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub accept_language: String,
    /// Cookies set before this request was issued
    pub cookies: Vec<RecordedCookie>,
}

type Reply = Result<HttpResponse, TransportError>;

/// Mock transport replaying scripted replies
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Scripted replies per URL
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    /// Requests in the order they were issued
    requests: Mutex<Vec<RecordedRequest>>,
    /// Cookies in the order they were set
    cookies: Mutex<Vec<RecordedCookie>>,
    /// Request counter
    request_count: Arc<AtomicUsize>,
}

impl MockTransport {
    /// Create a mock with no scripted routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply with `status` and `body` for `url`
    pub fn respond(self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.push(url.into(), Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queue a transport-level failure for `url`
    pub fn fail(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.push(url.into(), Err(TransportError::RequestFailed(message.into())));
        self
    }

    fn push(&self, url: String, reply: Reply) {
        self.routes.lock().entry(url).or_default().push_back(reply);
    }

    /// Total number of requests issued
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Number of requests issued for `url`
    pub fn request_count_for(&self, url: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.url == url).count()
    }

    /// Snapshot of the recorded requests
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Snapshot of the recorded cookies
    pub fn cookies(&self) -> Vec<RecordedCookie> {
        self.cookies.lock().clone()
    }

    fn next_reply(&self, url: &str) -> Reply {
        let mut routes = self.routes.lock();
        match routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(not_found),
            Some(queue) => queue.front().cloned().unwrap_or_else(not_found),
            None => not_found(),
        }
    }
}

fn not_found() -> Reply {
    Ok(HttpResponse::new(404, "Not Found"))
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str, accept_language: &str) -> Result<HttpResponse, TransportError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        let cookies = self.cookies();
        self.requests.lock().push(RecordedRequest {
            url: url.to_string(),
            accept_language: accept_language.to_string(),
            cookies,
        });
        self.next_reply(url)
    }
}

impl ConsentCookieStore for MockTransport {
    fn set_cookie(&self, name: &str, value: &str, domain: &str) {
        self.cookies.lock().push(RecordedCookie {
            name: name.to_string(),
            value: value.to_string(),
            domain: domain.to_string(),
        });
    }
}
