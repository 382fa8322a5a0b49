//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream base URL is an absolute http(s) URL
//! - Validate value ranges (port non-zero, identity/scope present)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use url::Url;

use crate::config::schema::{ProxyConfig, TokenSourceConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("upstream URL is required")]
    MissingUpstream,

    #[error("upstream URL {url:?} is invalid: {reason}")]
    InvalidUpstream { url: String, reason: String },

    #[error("listen port must be non-zero")]
    ZeroPort,

    #[error("credential {0} must not be empty")]
    EmptyCredentialField(&'static str),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.upstream_base() {
        None => errors.push(ValidationError::MissingUpstream),
        Some(base) => {
            if let Err(reason) = check_upstream(base) {
                errors.push(ValidationError::InvalidUpstream {
                    url: config.upstream_url.clone(),
                    reason,
                });
            }
        }
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if config.credentials.identity.trim().is_empty() {
        errors.push(ValidationError::EmptyCredentialField("identity"));
    }
    if config.credentials.scope.trim().is_empty() {
        errors.push(ValidationError::EmptyCredentialField("scope"));
    }
    match &config.credentials.source {
        TokenSourceConfig::Command { program, .. } if program.trim().is_empty() => {
            errors.push(ValidationError::EmptyCredentialField("command program"));
        }
        TokenSourceConfig::Env { var } if var.trim().is_empty() => {
            errors.push(ValidationError::EmptyCredentialField("environment variable"));
        }
        TokenSourceConfig::Static { token } if token.is_empty() => {
            errors.push(ValidationError::EmptyCredentialField("static token"));
        }
        _ => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream(base: &str) -> Result<(), String> {
    let url = Url::parse(base).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}
