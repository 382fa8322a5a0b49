//! Request types flowing through the forwarding pipeline.
//!
//! # Design Decisions
//! - The inbound body is fully buffered before forwarding starts
//! - Headers keep `HeaderMap` semantics: case-insensitive names, ordered values

use axum::body::Bytes;
use axum::http::{request::Parts, HeaderMap, Method};

/// A request as received from the caller.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Request path, always starting with `/`.
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    /// Assemble from request parts and an already-buffered body.
    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body,
        }
    }
}

/// A request as it will be sent upstream.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    /// Absolute target URL.
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}
