/*!
 * Transport collaborators.
 *
 * The core never talks to the network directly. It goes through:
 * - `Transport`: issues a GET request and returns status and body
 * - `ConsentCookieStore`: remembers the consent cookie for the platform domain
 *
 * `reqwest_client::ReqwestTransport` implements both on top of reqwest, and
 * `mock::MockTransport` replays scripted responses in tests.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::{TranscriptError, TransportError};

pub mod mock;
pub mod reqwest_client;

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues HTTP requests on behalf of the core
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Fetch `url`, sending `accept_language` as the language preference header
    ///
    /// # Returns
    /// * `Result<HttpResponse, TransportError>` - Any response the server produced,
    ///   whatever its status, or a transport-level failure
    async fn get(&self, url: &str, accept_language: &str) -> Result<HttpResponse, TransportError>;
}

/// Cookie storage scoped to the platform's cookie domain
pub trait ConsentCookieStore: Send + Sync + Debug {
    /// Set cookie `name` to `value` for `domain`, path `/`
    fn set_cookie(&self, name: &str, value: &str, domain: &str);
}

/// Shared handle the core uses to fetch text for a given video
#[derive(Debug, Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    accept_language: Arc<str>,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, accept_language: impl Into<Arc<str>>) -> Self {
        Self {
            transport,
            accept_language: accept_language.into(),
        }
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Fetch `url` and return its body.
    ///
    /// Transport failures and non-success statuses both surface as
    /// `TranscriptError::YouTubeRequestFailed` for `video_id`.
    pub async fn get_text(&self, video_id: &str, url: &str) -> Result<String, TranscriptError> {
        let response = self
            .transport
            .get(url, &self.accept_language)
            .await
            .map_err(|e| TranscriptError::YouTubeRequestFailed {
                video_id: video_id.to_string(),
                http_error: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(TranscriptError::YouTubeRequestFailed {
                video_id: video_id.to_string(),
                http_error: format!("HTTP error! status: {}", response.status),
            });
        }

        Ok(response.body)
    }
}

/// Decode the entities the watch page escapes inside its embedded JSON.
///
/// Replacements run in a fixed order, `&amp;` first.
pub fn decode_page_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
