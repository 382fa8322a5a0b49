//! The forwarding handler.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → precondition check (upstream + token present)
//!     → url.rs (compose target)
//!     → headers.rs (drop Host, set Authorization)
//!     → UpstreamClient::send (single attempt)
//!     → UpstreamResponse relayed, or ProxyError mapped to 500/502
//! ```

use std::sync::Arc;

use crate::credentials::TokenSource;
use crate::proxy::client::UpstreamClient;
use crate::proxy::error::ProxyError;
use crate::proxy::headers::{bearer_value, prepare_outbound};
use crate::proxy::request::{InboundRequest, OutboundRequest};
use crate::proxy::response::{ProxyResponse, UpstreamResponse};
use crate::proxy::url::UpstreamBase;

/// Forwards every inbound request to a single upstream with a bearer credential.
#[derive(Clone)]
pub struct Forwarder {
    upstream: Option<UpstreamBase>,
    credentials: Arc<dyn TokenSource>,
    client: Arc<dyn UpstreamClient>,
}

impl Forwarder {
    /// Create a forwarder. A `None` upstream makes every request fail with 500.
    pub fn new(
        upstream: Option<UpstreamBase>,
        credentials: Arc<dyn TokenSource>,
        client: Arc<dyn UpstreamClient>,
    ) -> Self {
        Self {
            upstream,
            credentials,
            client,
        }
    }

    pub fn upstream(&self) -> Option<&UpstreamBase> {
        self.upstream.as_ref()
    }

    /// Build the outbound request without sending it.
    pub fn prepare(&self, request: InboundRequest) -> Result<OutboundRequest, ProxyError> {
        let upstream = self.upstream.as_ref().ok_or(ProxyError::NotConfigured)?;
        let token = self.credentials.bearer_token().ok_or(ProxyError::NotConfigured)?;
        let authorization = bearer_value(&token)?;

        let url = upstream.join(&request.path, request.query.as_deref())?;

        let mut headers = request.headers;
        prepare_outbound(&mut headers, authorization);

        Ok(OutboundRequest {
            method: request.method,
            url,
            headers,
            body: request.body,
        })
    }

    /// Forward one request, returning upstream's response or the failure.
    pub async fn forward(&self, request: InboundRequest) -> Result<UpstreamResponse, ProxyError> {
        let outbound = self.prepare(request)?;
        tracing::debug!(method = %outbound.method, url = %outbound.url, "Forwarding request");

        let response = self.client.send(outbound).await?;
        tracing::debug!(status = %response.status, "Upstream responded");
        Ok(response)
    }

    /// Forward one request and map the outcome to the caller's response.
    pub async fn handle(&self, request: InboundRequest) -> ProxyResponse {
        match self.forward(request).await {
            Ok(response) => response.into(),
            Err(err) => {
                tracing::debug!(error = %err, status = %err.status(), "Request not forwarded");
                err.into()
            }
        }
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("upstream", &self.upstream)
            .field("has_token", &self.credentials.bearer_token().is_some())
            .finish()
    }
}
