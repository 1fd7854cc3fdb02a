//! HTTP transport used by the remote access probe.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use thiserror::Error;
use url::Url;

/// One probe: `GET <url>?username=<username>` with a JSON body.
#[derive(Clone, Debug)]
pub struct ProbeRequest {
    pub url: Url,
    pub username: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("remote endpoint did not answer within {0:?}")]
    Timeout(Duration),
    #[error("http error: {0}")]
    Http(#[source] reqwest::Error),
}

/// Transport collaborator for the remote access probe.
///
/// Retries, pooling and backoff belong to the implementation, not to callers.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    // Returns:
    // - Ok(Some(status)) => the endpoint answered
    // - Ok(None)         => the transport produced no response
    // - Err(_)           => transport fault (bad connection, timeout, ...)
    async fn execute(&self, request: ProbeRequest) -> Result<Option<u16>, TransportError>;
}

/// `reqwest`-backed transport with a fixed per-request timeout.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self { client, timeout })
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Http(err)
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ProbeRequest) -> Result<Option<u16>, TransportError> {
        let response = self
            .client
            .get(request.url)
            .query(&[("username", request.username.as_str())])
            .header(header::CONTENT_TYPE, "application/json")
            .body(request.body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        Ok(Some(response.status().as_u16()))
    }
}
