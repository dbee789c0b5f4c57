use gerrit_review_core::config::{Credentials, HttpConfig};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransportRequest<'a> {
    pub method: HttpMethod,
    pub url: &'a str,
    pub body: Option<&'a Value>,
    pub timeout: Duration,
}

/// Raw status and body. Interpretation belongs to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("connect failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// Seam between the request executor and the network.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: &TransportRequest<'_>) -> Result<TransportResponse, TransportFailure>;
}

/// Pooled, authenticated HTTP client shared by every tool call.
pub struct ReqwestTransport {
    client: Client,
    username: String,
    api_token: String,
}

impl ReqwestTransport {
    pub fn new(credentials: &Credentials, http: &HttpConfig) -> Result<Self, TransportFailure> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(http.connect_timeout())
            .timeout(http.request_timeout())
            .pool_max_idle_per_host(http.pool_max_idle_per_host)
            .build()
            .map_err(|e| TransportFailure::Other(e.to_string()))?;

        Ok(Self {
            client,
            username: credentials.username.clone(),
            api_token: credentials.api_token.clone(),
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &TransportRequest<'_>) -> Result<TransportResponse, TransportFailure> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Put => self.client.put(request.url),
            HttpMethod::Post => self.client.post(request.url),
        };
        let mut builder = builder
            .basic_auth(&self.username, Some(&self.api_token))
            .timeout(request.timeout);
        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify)?;
        Ok(TransportResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportFailure::Connect(err.to_string())
    } else {
        TransportFailure::Other(err.to_string())
    }
}
