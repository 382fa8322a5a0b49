//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Acquire the bearer token (fatal on failure)
//! - Build the upstream client and forwarder
//! - Bind the listener last, so traffic only arrives once ready

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{validate_config, ProxyConfig, ValidationError};
use crate::credentials::{provider_from_config, CredentialError, CredentialHolder, TokenProvider};
use crate::http::HttpServer;
use crate::proxy::{Forwarder, HttpUpstreamClient, TransportError, UpstreamBase};

/// Error type for startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Config(Vec<ValidationError>),

    #[error("failed to get token: {0}")]
    Credential(#[from] CredentialError),

    #[error("failed to initialize upstream client: {0}")]
    Client(TransportError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fully initialized proxy, ready to serve.
pub struct Bootstrapped {
    pub server: HttpServer,
    pub listener: TcpListener,
}

/// Parse the configured upstream base. Failures are configuration errors.
fn upstream_from_config(config: &ProxyConfig) -> Result<Option<UpstreamBase>, StartupError> {
    config
        .upstream_base()
        .map(|base| {
            UpstreamBase::parse(base).map_err(|e| {
                StartupError::Config(vec![ValidationError::InvalidUpstream {
                    url: config.upstream_url.clone(),
                    reason: e.to_string(),
                }])
            })
        })
        .transpose()
}

/// Initialize using the provider named in the configuration.
pub async fn bootstrap(config: &ProxyConfig) -> Result<Bootstrapped, StartupError> {
    let provider = provider_from_config(&config.credentials.source);
    bootstrap_with(config, provider.as_ref()).await
}

/// Initialize with an explicit token provider.
pub async fn bootstrap_with(config: &ProxyConfig, provider: &dyn TokenProvider) -> Result<Bootstrapped, StartupError> {
    validate_config(config).map_err(StartupError::Config)?;
    let upstream = upstream_from_config(config)?;

    let identity = &config.credentials.identity;
    let scope = &config.credentials.scope;
    let token = provider.fetch(identity, scope).await?;
    let credentials = CredentialHolder::with_token(token)?;
    tracing::info!(identity = %identity, scope = %scope, "Got auth token");

    let client = HttpUpstreamClient::new().map_err(StartupError::Client)?;
    let forwarder = Forwarder::new(upstream, Arc::new(credentials), Arc::new(client));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address: address.clone(), source })?;

    if let (Some(upstream), Ok(local)) = (forwarder.upstream(), listener.local_addr()) {
        tracing::info!(listen = %local, upstream = %upstream, "Proxy ready");
    }

    Ok(Bootstrapped {
        server: HttpServer::new(forwarder),
        listener,
    })
}
