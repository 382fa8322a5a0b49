//! Per-request forwarding pipeline.
//!
//! # Data Flow
//! ```text
//! http::server (axum adapter)
//!     → request.rs (InboundRequest, body buffered)
//!     → forward.rs (Forwarder::handle)
//!         → url.rs / headers.rs (OutboundRequest)
//!         → client.rs (UpstreamClient)
//!     → response.rs (ProxyResponse relayed to the caller)
//! ```
//!
//! # Design Decisions
//! - Config, credential and client are injected; no global state
//! - Outcomes are typed (`Result<UpstreamResponse, ProxyError>`) and mapped
//!   to status codes only at the boundary
//! - A single attempt per request; no retries

pub mod client;
pub mod error;
pub mod forward;
pub mod headers;
pub mod request;
pub mod response;
pub mod url;

pub use client::{HttpUpstreamClient, UpstreamClient};
pub use error::{ProxyError, TransportError};
pub use forward::Forwarder;
pub use request::{InboundRequest, OutboundRequest};
pub use response::{ProxyResponse, UpstreamResponse};
pub use self::url::UpstreamBase;
