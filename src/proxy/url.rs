//! Upstream URL composition.
//!
//! The inbound path is resolved relative to the upstream base (with a trailing
//! slash), so `..` segments can climb the base path but never change the
//! scheme, host or port. The query string is appended verbatim.

use url::Url;

use crate::proxy::error::TransportError;

/// A validated upstream base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamBase {
    /// Base with exactly one trailing slash, used for resolution.
    base: Url,
}

impl UpstreamBase {
    /// Parse an absolute http(s) base URL. Trailing slashes are normalized.
    pub fn parse(raw: &str) -> Result<Self, TransportError> {
        let invalid = |reason: String| TransportError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };

        let trimmed = raw.trim_end_matches('/');
        let base = Url::parse(&format!("{trimmed}/")).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(invalid("expected an absolute http(s) URL".to_string()));
        }
        Ok(Self { base })
    }

    /// Base URL without the trailing slash.
    pub fn as_str(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Compose the upstream target for an inbound path and optional query.
    pub fn join(&self, path: &str, query: Option<&str>) -> Result<String, TransportError> {
        // Leading slashes would make the reference absolute or scheme-relative.
        let relative = path.trim_start_matches('/');
        let joined = self
            .base
            .join(&format!("./{relative}"))
            .map_err(|e| TransportError::InvalidUrl {
                url: format!("{}{}", self.base, relative),
                reason: e.to_string(),
            })?;

        let mut target = String::from(joined);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        Ok(target)
    }
}

impl std::fmt::Display for UpstreamBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
