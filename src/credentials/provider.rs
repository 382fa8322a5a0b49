//! Token providers.
//!
//! A provider is asked exactly once, at startup, for a bearer token issued to
//! a given identity and scope. Any failure aborts startup.

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::TokenSourceConfig;

/// Error type for credential acquisition.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("token is empty")]
    EmptyToken,

    #[error("token contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("environment variable {0} is not set")]
    MissingEnv(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{program} printed a token that is not valid UTF-8")]
    NonUtf8Output { program: String },
}

/// Source of bearer tokens.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a token for `identity` with `scope`.
    async fn fetch(&self, identity: &str, scope: &str) -> Result<String, CredentialError>;
}

/// Provider returning a token supplied up-front.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn fetch(&self, _identity: &str, _scope: &str) -> Result<String, CredentialError> {
        non_empty(self.token.clone())
    }
}

/// Provider reading the token from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn fetch(&self, _identity: &str, _scope: &str) -> Result<String, CredentialError> {
        let token = std::env::var(&self.var).map_err(|_| CredentialError::MissingEnv(self.var.clone()))?;
        non_empty(token.trim().to_string())
    }
}

/// Provider running an external token tool and reading its stdout.
///
/// `{identity}` and `{scope}` placeholders in the arguments are replaced
/// before the program is spawned.
#[derive(Debug, Clone)]
pub struct CommandTokenProvider {
    program: String,
    args: Vec<String>,
}

impl CommandTokenProvider {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn render_args(&self, identity: &str, scope: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace("{identity}", identity).replace("{scope}", scope))
            .collect()
    }
}

#[async_trait]
impl TokenProvider for CommandTokenProvider {
    async fn fetch(&self, identity: &str, scope: &str) -> Result<String, CredentialError> {
        let args = self.render_args(identity, scope);
        tracing::debug!(program = %self.program, ?args, "Requesting token");

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| CredentialError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CredentialError::CommandFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| CredentialError::NonUtf8Output {
            program: self.program.clone(),
        })?;
        non_empty(stdout.trim().to_string())
    }
}

fn non_empty(token: String) -> Result<String, CredentialError> {
    if token.is_empty() {
        Err(CredentialError::EmptyToken)
    } else {
        Ok(token)
    }
}

/// Build the provider selected by configuration.
pub fn provider_from_config(source: &TokenSourceConfig) -> Box<dyn TokenProvider> {
    match source {
        TokenSourceConfig::Command { program, args } => Box::new(CommandTokenProvider::new(program, args.clone())),
        TokenSourceConfig::Env { var } => Box::new(EnvTokenProvider::new(var)),
        TokenSourceConfig::Static { token } => Box::new(StaticTokenProvider::new(token)),
    }
}
