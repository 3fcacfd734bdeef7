use async_trait::async_trait;
use log::{debug, warn};
use reqwest::cookie::Jar;
use reqwest::{header, Client};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::app_config::HttpConfig;
use crate::errors::TransportError;
use crate::transport::{ConsentCookieStore, HttpResponse, Transport};

/// reqwest based transport with its own cookie jar
///
/// The jar is shared with the client, so a consent cookie set through
/// `ConsentCookieStore` is sent on every following request to the same domain.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP client for making requests
    client: Client,
    /// Cookies sent along with every request
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    /// Create a transport with the given user agent and request timeout
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, TransportError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self { client, jar })
    }

    /// Create a transport from the `http` section of the configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, TransportError> {
        Self::new(&config.user_agent, config.timeout_secs)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, accept_language: &str) -> Result<HttpResponse, TransportError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT_LANGUAGE, accept_language)
            .send()
            .await
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::BodyRead(e.to_string()))?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}

impl ConsentCookieStore for ReqwestTransport {
    fn set_cookie(&self, name: &str, value: &str, domain: &str) {
        let origin = format!("https://{}", domain.trim_start_matches('.'));
        let url = match Url::parse(&origin) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot set cookie {} for invalid domain {}: {}", name, domain, e);
                return;
            }
        };

        let cookie = format!("{}={}; Domain={}; Path=/", name, value, domain);
        self.jar.add_cookie_str(&cookie, &url);
    }
}
