//! The single HTTP exchange everything else is built on.
//!
//! [`Transport`] is the seam between the protocol logic and the network. [`HttpTransport`] is
//! the `reqwest` implementation used by default; tests substitute a scripted one.

use std::future::Future;
use std::time::Instant;

use log::debug;
use reqwest::{Client, Method, StatusCode};

use crate::models::Result;

/// One outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Attach a JSON body and the matching content type.
    pub fn json_body(self, body: String) -> Self {
        let mut request = self.header("Content-Type", "application/json");
        request.body = Some(body);
        request
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Performs exactly one request/response exchange. No retries.
///
/// The returned future is `Send` so sessions and jobs over any transport can be spawned.
pub trait Transport: Clone + Send + Sync {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// `reqwest`-backed transport. Cloning shares the underlying connection pool.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
        }
    }

    /// Use a preconfigured client (timeouts, proxies, custom roots).
    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        debug!("[DB2_HTTP] Sending {} to {}", method, url);
        let start = Instant::now();

        let mut builder = self.http_client.request(method, &url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let resp = builder.send().await?;

        // Capture the status code before consuming the response
        let status = resp.status();
        let body = resp.text().await?;

        debug!(
            "[DB2_HTTP] Response received: status={} duration_ms={}",
            status,
            start.elapsed().as_millis()
        );

        Ok(HttpResponse { status, body })
    }
}
