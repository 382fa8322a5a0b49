//! Header transformation in both directions.
//!
//! Outbound:
//! - `Host` is removed; the client derives it from the upstream URL
//! - `Authorization` is replaced with the proxy's bearer credential
//! - Everything else passes through untouched, in order
//!
//! Relayed responses:
//! - Connection-level headers are dropped; the body has been buffered, so the
//!   server frames it itself
//! - Everything else, `Content-Length` included, is kept verbatim

use axum::http::header::{self, AUTHORIZATION, HOST};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::proxy::error::ProxyError;

/// Headers describing the upstream connection rather than the message.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Build the `Authorization` value for a token.
pub fn bearer_value(token: &str) -> Result<HeaderValue, ProxyError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ProxyError::NotConfigured)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Apply the outbound header policy in place.
pub fn prepare_outbound(headers: &mut HeaderMap, authorization: HeaderValue) {
    headers.remove(HOST);
    // insert drops every existing value; caller credentials are never merged.
    headers.insert(AUTHORIZATION, authorization);
}

/// Check if a header only applies to a single connection.
pub fn is_hop_by_hop_header(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Drop connection-level headers from a buffered upstream response.
///
/// Headers named in `Connection` are dropped as well.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(*name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_host_and_sets_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("Host", HeaderValue::from_static("localhost:4000"));
        headers.insert("X-Custom", HeaderValue::from_static("1"));

        prepare_outbound(&mut headers, bearer_value("tok123").unwrap());

        assert!(headers.get(HOST).is_none());
        assert_eq!(headers["x-custom"], "1");
        assert_eq!(headers[AUTHORIZATION], "Bearer tok123");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn caller_authorization_is_overwritten() {
        let mut headers = HeaderMap::new();
        headers.append(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        headers.append(AUTHORIZATION, HeaderValue::from_static("Bearer caller"));

        prepare_outbound(&mut headers, bearer_value("tok123").unwrap());

        let values: Vec<_> = headers.get_all(AUTHORIZATION).iter().collect();
        assert_eq!(values, vec!["Bearer tok123"]);
    }

    #[test]
    fn repeated_headers_keep_order() {
        let mut headers = HeaderMap::new();
        headers.append("accept", HeaderValue::from_static("text/html"));
        headers.append("accept", HeaderValue::from_static("application/json"));

        prepare_outbound(&mut headers, bearer_value("t").unwrap());

        let values: Vec<_> = headers.get_all("accept").iter().collect();
        assert_eq!(values, vec!["text/html", "application/json"]);
    }

    #[test]
    fn relay_drops_connection_headers_only() {
        let mut headers = HeaderMap::new();
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, X-Trace-Hop"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-trace-hop", HeaderValue::from_static("1"));
        headers.insert(header::TRAILER, HeaderValue::from_static("expires"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("5"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));

        strip_hop_by_hop(&mut headers);

        assert!(headers.get(header::TRANSFER_ENCODING).is_none());
        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get("keep-alive").is_none());
        assert!(headers.get("x-trace-hop").is_none());
        assert!(headers.get(header::TRAILER).is_none());
        assert_eq!(headers[header::CONTENT_LENGTH], "5");
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
        assert_eq!(headers.get_all(header::SET_COOKIE).iter().count(), 2);
    }

    #[test]
    fn hop_by_hop_lookup() {
        assert!(is_hop_by_hop_header(&header::TRANSFER_ENCODING));
        assert!(is_hop_by_hop_header(&HeaderName::from_static("proxy-connection")));
        assert!(!is_hop_by_hop_header(&header::CONTENT_LENGTH));
        assert!(!is_hop_by_hop_header(&AUTHORIZATION));
    }

    #[test]
    fn bearer_value_is_sensitive() {
        assert!(bearer_value("tok").unwrap().is_sensitive());
        assert_eq!(bearer_value("bad\r\ntoken"), Err(ProxyError::NotConfigured));
    }
}
