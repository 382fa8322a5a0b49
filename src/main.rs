//! Authenticating Reverse Proxy
//!
//! ```text
//!     Client ──▶ localhost:<port> ──▶ Forwarder ──▶ <upstream>/<path>?<query>
//!                                        │             + Authorization: Bearer <token>
//!                                        ▼
//!                                CredentialHolder (token fetched once at startup)
//! ```

use std::path::PathBuf;

use clap::Parser;

use auth_proxy::config::{read_config, LogFormat, ProxyConfig, TokenSourceConfig};
use auth_proxy::lifecycle::{bootstrap, Shutdown};
use auth_proxy::observability::init_logging;

#[derive(Parser, Debug)]
#[command(name = "auth-proxy")]
#[command(about = "Forward local HTTP requests to an upstream with a bearer token attached", long_about = None)]
struct Cli {
    /// Target URL to proxy to
    target_url: Option<String>,

    /// Port to run on
    #[arg(short, long)]
    port: Option<u16>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// User ID for token
    #[arg(short, long)]
    uid: Option<String>,

    /// Token scope
    #[arg(short, long)]
    scope: Option<String>,

    /// Use this bearer token instead of running the token tool
    #[arg(long, env = "AUTH_PROXY_TOKEN", hide_env_values = true, conflicts_with = "token_command")]
    token: Option<String>,

    /// Program printing a token on stdout; `{identity}` and `{scope}` are substituted
    #[arg(long, num_args = 1.., value_name = "PROGRAM [ARGS]...")]
    token_command: Option<Vec<String>>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    /// Layer command-line values over a base configuration.
    fn apply(self, mut config: ProxyConfig) -> ProxyConfig {
        if let Some(url) = self.target_url {
            config.upstream_url = url;
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(host) = self.host {
            config.listener.host = host;
        }
        if let Some(uid) = self.uid {
            config.credentials.identity = uid;
        }
        if let Some(scope) = self.scope {
            config.credentials.scope = scope;
        }
        if let Some(token) = self.token {
            config.credentials.source = TokenSourceConfig::Static { token };
        }
        if let Some(mut command) = self.token_command.filter(|c| !c.is_empty()) {
            let program = command.remove(0);
            config.credentials.source = TokenSourceConfig::Command { program, args: command };
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => read_config(path)?,
        None => ProxyConfig::default(),
    };
    let config = cli.apply(base);

    init_logging(&config.logging)?;
    tracing::info!("auth-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let ready = match bootstrap(&config).await {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            std::process::exit(1);
        }
    };

    let shutdown = Shutdown::new();
    ready.server.run(ready.listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
