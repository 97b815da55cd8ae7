//! The HTTP seam between the [`RecordClient`](crate::RecordClient) and the
//! record store.
//!
//! The client builds [`StoreRequest`]s and interprets status codes; a
//! [`Transport`] only moves bytes. [`HttpTransport`] is the production
//! implementation; `MemoryTransport` (feature `test-util`)
//! stands in for tests.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Per-attempt timeout for a single store request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the store API token.
const TOKEN_HEADER: &str = "xc-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        })
    }
}

/// A request relative to the store's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRequest {
    pub method: Method,
    /// Path beginning with `/api/v2/tables/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl StoreRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter only when `value` is present and non-empty.
    pub fn query_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.query(key, v),
            _ => self,
        }
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Any response the store produced, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResponse {
    pub status: u16,
    /// Parsed JSON body; a non-JSON body is kept as a string.
    pub body: Value,
}

impl StoreResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request that produced no response at all.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: StoreRequest) -> Result<StoreResponse, TransportError>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// reqwest-backed transport with a fixed per-request timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_token: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        })
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

fn transport_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: StoreRequest) -> Result<StoreResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .client
            .request(Self::method(request.method), url)
            .header(TOKEN_HEADER, &self.api_token)
            .query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(StoreResponse { status, body })
    }
}
