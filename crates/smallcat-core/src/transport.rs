//! HTTP transport for small.cat
//!
//! Provides the [`Transport`] seam used by the workflow steps and the
//! reqwest-backed implementation holding the shared cookie session.

use std::future::Future;
use std::time::Duration;

use log::debug;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Url;

use crate::error::{Result, SmallcatError};

const BASE_URL: &str = "https://small.cat";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MAX_REDIRECTS: usize = 5;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service origin without trailing slash (default: "https://small.cat")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at a different origin (mirrors, test servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Landing page carrying the authenticity token
    pub fn landing_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    /// Form submission endpoint
    pub fn submit_url(&self) -> String {
        format!("{}/entries", self.base_url.trim_end_matches('/'))
    }
}

/// A fully read HTTP response
///
/// Redirects are never followed by the transport, so `location` is the
/// raw `Location` header of this exact response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// URL the request was sent to
    pub url: String,
    pub status: u16,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    /// Body decoded as UTF-8, `None` if it is not valid UTF-8
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// True for 4xx and 5xx statuses
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Redirect target resolved against the request URL
    ///
    /// Returns `None` unless the status is 3xx and a `Location` header
    /// resolves to an absolute URL.
    pub fn destination(&self) -> Option<String> {
        if !(300..400).contains(&self.status) {
            return None;
        }
        let location = self.location.as_deref()?.trim();
        if location.is_empty() {
            return None;
        }
        let base = Url::parse(&self.url).ok()?;
        base.join(location).ok().map(String::from)
    }
}

/// HTTP operations needed by the shortening workflow
///
/// Implementations must not follow redirects and must keep cookies
/// between calls, since the authenticity token is bound to the session.
pub trait Transport: Send + Sync + 'static {
    /// Issue a GET request
    fn get(&self, url: &str) -> impl Future<Output = Result<Response>> + Send;

    /// POST an already encoded `application/x-www-form-urlencoded` body
    fn post_form(&self, url: &str, body: String) -> impl Future<Output = Result<Response>> + Send;
}

/// GET `url`, following up to five redirects by hand
///
/// Used for page loads (landing and confirmation). The submission POST
/// is not routed through here, its redirect is followed by the caller.
///
/// # Errors
/// - Whatever the transport returns for a single request
/// - `InvalidResponse` if the chain is longer than five hops or a
///   redirect carries no usable `Location`
pub async fn get_following<T: Transport>(transport: &T, url: &str) -> Result<Response> {
    let mut current = url.to_string();

    for _ in 0..=MAX_REDIRECTS {
        let response = transport.get(&current).await?;

        if !(300..400).contains(&response.status) {
            return Ok(response);
        }

        current = response.destination().ok_or_else(|| {
            SmallcatError::invalid_response(format!(
                "{} redirected (HTTP {}) without a location",
                current, response.status
            ))
        })?;
        debug!("redirected to {}", current);
    }

    Err(SmallcatError::invalid_response(format!(
        "too many redirects loading {}",
        url
    )))
}

/// reqwest-backed transport with a cookie store
///
/// One instance is the process-wide HTTP session; share it through an
/// `Arc` instead of building new ones per request.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a new transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a new transport with custom configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .default_headers({
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::ACCEPT,
                    HeaderValue::from_static("text/html,application/xhtml+xml"),
                );
                headers
            })
            .build()
            .map_err(SmallcatError::HttpClient)?;

        Ok(Self { client })
    }

    async fn read(url: &str, response: reqwest::Response) -> Result<Response> {
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| SmallcatError::invalid_response(format!("reading {}: {}", url, e)))?;

        debug!("{} -> {} ({} bytes)", url, status, body.len());

        Ok(Response {
            url: url.to_string(),
            status,
            location,
            body: body.to_vec(),
        })
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SmallcatError::invalid_response(format!("GET {}: {}", url, e)))?;

        Self::read(url, response).await
    }

    async fn post_form(&self, url: &str, body: String) -> Result<Response> {
        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| SmallcatError::invalid_response(format!("POST {}: {}", url, e)))?;

        Self::read(url, response).await
    }
}
