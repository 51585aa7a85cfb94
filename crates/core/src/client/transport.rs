//! HTTP transport for ModernGov requests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

/// Maximum characters of a response body kept in error messages.
pub const BODY_EXCERPT_CHARS: usize = 200;

/// Errors from the transport layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP {status}: {excerpt}")]
    Status { status: u16, excerpt: String },

    #[error("Response had no body")]
    EmptyBody,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connection(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

/// An outbound GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Resolved `{service base}/{operation}` URL.
    pub url: Url,
    /// Query parameters, in the order they are sent.
    pub params: Vec<(String, String)>,
}

impl TransportRequest {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.push((name.to_string(), value.into()));
        self
    }

    /// Value of the first parameter named `name`.
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Full request URL with the query string, for logs and diagnostics.
    pub fn display_url(&self) -> String {
        if self.params.is_empty() {
            return self.url.to_string();
        }
        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.url, query)
    }
}

/// Performs GET requests and returns the response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &TransportRequest) -> Result<String, TransportError>;
}

/// Transport backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &TransportRequest) -> Result<String, TransportError> {
        debug!(url = %request.display_url(), "ModernGov request");

        let response = self
            .client
            .get(request.url.clone())
            .query(&request.params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                excerpt: excerpt(&body),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(TransportError::EmptyBody);
        }

        Ok(body)
    }
}

/// First [`BODY_EXCERPT_CHARS`] characters of `body`.
pub fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
