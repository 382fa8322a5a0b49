//! Bearer credential storage.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::http::HeaderValue;

use crate::credentials::provider::CredentialError;

/// Read access to the current bearer token.
///
/// `None` means no credential has been installed; callers must refuse to
/// forward in that case.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<Arc<str>>;
}

/// Holds the single bearer token used for every upstream request.
#[derive(Debug, Default)]
pub struct CredentialHolder {
    // arc-swap only stores sized pointees, hence the outer Arc.
    token: ArcSwapOption<Arc<str>>,
}

impl CredentialHolder {
    /// Create a holder with no token installed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a holder with a validated token.
    pub fn with_token(token: impl Into<String>) -> Result<Self, CredentialError> {
        let holder = Self::empty();
        holder.set(token)?;
        Ok(holder)
    }

    /// Install or replace the token.
    ///
    /// Empty tokens and tokens that cannot appear in an HTTP header are rejected
    /// and leave the previous token in place.
    pub fn set(&self, token: impl Into<String>) -> Result<(), CredentialError> {
        let token = token.into();
        if token.is_empty() {
            return Err(CredentialError::EmptyToken);
        }
        if HeaderValue::from_str(&format!("Bearer {token}")).is_err() {
            return Err(CredentialError::InvalidToken);
        }
        self.token.store(Some(Arc::new(Arc::from(token))));
        Ok(())
    }

    /// Current token, if any.
    pub fn get(&self) -> Option<Arc<str>> {
        self.token.load().as_deref().map(Arc::clone)
    }
}

impl TokenSource for CredentialHolder {
    fn bearer_token(&self) -> Option<Arc<str>> {
        self.get()
    }
}
