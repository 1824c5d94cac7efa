//! Network seam for the cache controller.

use async_trait::async_trait;
use thiserror::Error;

use super::http::{Request, Response};

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced an HTTP response
    #[error("network error: {0}")]
    Network(String),
}

/// Performs a live fetch. Returns `Err` only when no HTTP response was
/// received; error statuses are ordinary responses.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

// == HTTP Fetcher ==
/// [`Fetcher`] backed by a reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let mut outgoing = self
            .client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());
        if !request.body().is_empty() {
            outgoing = outgoing.body(request.body().clone());
        }

        let upstream = outgoing
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = upstream.status();
        let headers = upstream.headers().clone();
        let body = upstream
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Response::from_parts(status, headers, body))
    }
}
