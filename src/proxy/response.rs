//! Response types: what upstream returned and what the caller receives.

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::proxy::error::ProxyError;
use crate::proxy::headers::strip_hop_by_hop;

/// A complete upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// The response written back to the caller.
///
/// Either a relay of an [`UpstreamResponse`] (connection-level headers
/// removed, everything else verbatim) or a synthetic plain-text error.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ProxyResponse {
    /// Plain-text response with no headers beyond what the server adds.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from(body.into()),
        }
    }
}

impl From<UpstreamResponse> for ProxyResponse {
    fn from(upstream: UpstreamResponse) -> Self {
        let mut headers = upstream.headers;
        strip_hop_by_hop(&mut headers);
        Self {
            status: upstream.status,
            headers,
            body: upstream.body,
        }
    }
}

impl From<ProxyError> for ProxyResponse {
    fn from(err: ProxyError) -> Self {
        Self::text(err.status(), err.to_string())
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
