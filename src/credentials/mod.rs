//! Credential subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     TokenProvider (command / env / static)
//!     → fetch(identity, scope)
//!     → CredentialHolder::set (validated, atomically stored)
//!
//! Per request:
//!     Forwarder → TokenSource::bearer_token() → "Authorization: Bearer <token>"
//! ```
//!
//! # Design Decisions
//! - The token is acquired once, before the listener binds
//! - Reads are lock-free; a refresh task could swap the token without
//!   changing the forwarding handler
//! - Handlers re-check token presence on every request

pub mod holder;
pub mod provider;

pub use holder::{CredentialHolder, TokenSource};
pub use provider::{
    provider_from_config, CommandTokenProvider, CredentialError, EnvTokenProvider, StaticTokenProvider,
    TokenProvider,
};
