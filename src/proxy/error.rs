//! Forwarding error taxonomy.
//!
//! # Design Decisions
//! - Upstream 4xx/5xx are not errors; they are relayed
//! - Each variant maps to exactly one status code at the boundary
//! - No variant is retried

use std::error::Error as StdError;

use axum::http::StatusCode;

/// The outbound call could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The composed target is not a usable URL.
    #[error("invalid upstream URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connect, TLS, timeout, protocol or body-read failure.
    #[error("{0}")]
    Request(String),
}

impl TransportError {
    /// Build a transport error whose description includes the full source chain.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        Self::Request(describe_chain(err))
    }
}

/// Errors produced while handling one inbound request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    /// Upstream URL or bearer token missing.
    #[error("Proxy not configured")]
    NotConfigured,

    /// The caller's body could not be read.
    #[error("Failed to read request body")]
    InboundBody,

    #[error("Proxy error: {0}")]
    Transport(#[from] TransportError),
}

impl ProxyError {
    /// Status code returned to the caller for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::InboundBody => StatusCode::BAD_REQUEST,
            ProxyError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Join an error and all of its sources with `": "`, skipping repeats.
fn describe_chain(err: &(dyn StdError + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !description.ends_with(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }
    description
}
