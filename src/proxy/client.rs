//! Outbound HTTP transport.
//!
//! # Responsibilities
//! - Issue one upstream request with arbitrary method/URL/headers/body
//! - Buffer the upstream response completely
//! - Report every transport-level fault as a `TransportError`
//!
//! # Design Decisions
//! - One pooled client shared by all handlers
//! - Redirects are relayed to the caller, never followed
//! - No timeouts beyond the transport's defaults

use async_trait::async_trait;
use url::Url;

use crate::proxy::error::TransportError;
use crate::proxy::request::OutboundRequest;
use crate::proxy::response::UpstreamResponse;

/// Capability to perform a single upstream HTTP exchange.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, TransportError>;
}

/// `reqwest`-backed upstream client.
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: reqwest::Client,
}

impl HttpUpstreamClient {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| TransportError::from_error(&e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, TransportError> {
        let url = Url::parse(&request.url).map_err(|e| TransportError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .request(request.method, url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| TransportError::from_error(&e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| TransportError::from_error(&e))?;

        Ok(UpstreamResponse { status, headers, body })
    }
}
