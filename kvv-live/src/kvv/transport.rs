//! Transport abstraction for issuing HTTPS requests.
//!
//! The client is written against the [`Transport`] trait so tests and
//! development setups can substitute canned responses for real network
//! calls (see `kvv::mock`). The production implementation is a thin
//! reqwest wrapper.

use async_trait::async_trait;

/// Failure reported by a transport implementation.
///
/// `status` is present when the request got as far as an HTTP response;
/// pure network failures (connect, DNS, timeout, cancellation) leave it
/// empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    /// HTTP status code, if the service answered at all.
    pub status: Option<u16>,

    /// Human-readable description of what went wrong.
    pub message: String,
}

/// Capability to perform a GET request and return the raw response body.
///
/// Implementations must be shareable across tasks; the client holds no
/// other mutable state, so a `Send + Sync` transport makes the whole
/// client safe to use concurrently.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and return the response body bytes.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportFailure>;
}

/// Transport backed by a real HTTP client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self, TransportFailure> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TransportFailure {
                status: None,
                message: e.to_string(),
            })?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportFailure> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TransportFailure {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportFailure {
                status: Some(status.as_u16()),
                message: format!("HTTP {status}"),
            });
        }

        response
            .bytes()
            .await
            .map(|body| body.to_vec())
            .map_err(|e| TransportFailure {
                status: None,
                message: e.to_string(),
            })
    }
}
