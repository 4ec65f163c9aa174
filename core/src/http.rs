//! HTTP transport seam.
//!
//! # Design
//! The executor only ever sees [`Transport`], an object-safe trait that
//! performs a GET against a path below one base URL and returns the response
//! as plain data. Production code uses [`HttpTransport`] (a thin `reqwest`
//! wrapper); tests inject doubles that count calls, fail on demand, or serve
//! canned bodies. Status interpretation stays out of the transport; a 404 is
//! a response, not a transport failure.

use async_trait::async_trait;

use crate::error::ClientError;

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The injected HTTP collaborator. Implementations must be shareable across
/// the worker threads that drive concurrent requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET for `path` (absolute, starting with `/`) against the
    /// transport's base URL.
    async fn get(&self, path: &str) -> Result<HttpResponse, ClientError>;
}

/// Production transport bound to one validated base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Validates `base_url` and builds the underlying client.
    ///
    /// Fails with [`ClientError::Configuration`] for anything that does not
    /// parse as an absolute `http`/`https` URL, so a handle is never created
    /// around an address that can only fail later.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let url = reqwest::Url::parse(base_url)
            .map_err(|e| ClientError::Configuration(format!("{base_url:?}: {e}")))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ClientError::Configuration(format!(
                    "unsupported scheme {other:?} in {base_url:?}"
                )))
            }
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<HttpResponse, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
