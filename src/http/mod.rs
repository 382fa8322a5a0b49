//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, wildcard route, body buffering)
//!     → proxy::Forwarder (compose, authenticate, forward)
//!     → Send upstream's response (or a synthetic error) to client
//! ```

pub mod server;

pub use server::{AppState, HttpServer};
