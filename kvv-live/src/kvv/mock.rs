//! Mock transport for exercising the client without network access.
//!
//! Canned responses are registered per URL path; every performed request
//! is recorded so tests can assert on the exact URLs the client builds.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use super::transport::{Transport, TransportFailure};

/// Transport that serves pre-registered responses.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: HashMap<String, Result<Vec<u8>, TransportFailure>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    /// Create an empty mock; unregistered paths answer like a 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response body for every request whose URL path equals
    /// `path` (query parameters are ignored for matching).
    pub fn on(mut self, path: &str, body: &str) -> Self {
        self.responses
            .insert(path.to_string(), Ok(body.as_bytes().to_vec()));
        self
    }

    /// Register a failure for every request whose URL path equals `path`.
    pub fn on_failure(mut self, path: &str, failure: TransportFailure) -> Self {
        self.responses.insert(path.to_string(), Err(failure));
        self
    }

    /// Handle to the log of requested URLs. Clone it before handing the
    /// mock to a client.
    pub fn request_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportFailure> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(url.to_string());

        let path = Url::parse(url)
            .map(|parsed| parsed.path().to_string())
            .map_err(|e| TransportFailure {
                status: None,
                message: format!("unparseable URL {url:?}: {e}"),
            })?;

        match self.responses.get(&path) {
            Some(response) => response.clone(),
            None => Err(TransportFailure {
                status: Some(404),
                message: format!("no mock response for {path}"),
            }),
        }
    }
}
