//! Authenticating Reverse Proxy Library
//!
//! Accepts any request on a local port, attaches a bearer token obtained at
//! startup, forwards it to a fixed upstream base URL and relays the response.

pub mod config;
pub mod credentials;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::schema::ProxyConfig;
pub use credentials::{CredentialHolder, TokenProvider, TokenSource};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::{Forwarder, UpstreamClient};
