//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the authenticating proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Upstream base URL every request is forwarded to.
    /// Empty means unset; the handler then refuses all requests.
    pub upstream_url: String,

    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// How the bearer credential is obtained at startup.
    pub credentials: CredentialConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl ProxyConfig {
    /// Upstream base URL with trailing slashes removed, or `None` when unset.
    pub fn upstream_base(&self) -> Option<&str> {
        let trimmed = self.upstream_url.trim_end_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Socket address string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listener.host, self.listener.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind. Loopback by default; the proxy hands out a credential.
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

/// Credential acquisition settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Identity the token is requested for.
    pub identity: String,

    /// Scope the token is requested with.
    pub scope: String,

    /// Where the token comes from.
    pub source: TokenSourceConfig,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            identity: "uid".to_string(),
            scope: "uid".to_string(),
            source: TokenSourceConfig::default(),
        }
    }
}

/// Token source selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenSourceConfig {
    /// Run an external program and read the token from its stdout.
    /// `{identity}` and `{scope}` in `args` are substituted.
    Command { program: String, args: Vec<String> },

    /// Read the token from an environment variable.
    Env { var: String },

    /// Use a fixed token.
    Static { token: String },
}

impl Default for TokenSourceConfig {
    fn default() -> Self {
        Self::Command {
            program: "zign".to_string(),
            args: vec![
                "token".to_string(),
                "--name".to_string(),
                "{identity}".to_string(),
                "{scope}".to_string(),
            ],
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,

    /// Default filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "auth_proxy=info,tower_http=warn".to_string(),
        }
    }
}
