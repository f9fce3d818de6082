//! Parsed request head handed to the routing core.
//!
//! # Responsibilities
//! - Carry everything the router and dispatcher need (method, path,
//!   query, protocol, headers, cookies) without a body
//! - Parse cookies once, up front
//! - Provide a builder surface for tests and the transport adapter
//!
//! # Design Decisions
//! - The core never sees a socket or a body; the transport layer
//!   (or a test) constructs the head and receives a [`Reply`] back
//! - Cookie parsing is tolerant: malformed pairs are skipped
//!
//! [`Reply`]: crate::http::Reply

use std::collections::HashMap;
use std::fmt;

use axum::http::{header, HeaderMap, HeaderValue, Method, Uri, Version};

/// Whether the request arrived over plain HTTP or TLS.
///
/// The transport layer decides this; origin-form request URIs carry no
/// scheme, so it cannot be recovered from the URI alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::Https => write!(f, "https"),
        }
    }
}

/// An already-parsed request, minus its body.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub version: Version,
    pub protocol: Protocol,
    pub headers: HeaderMap,
    cookies: HashMap<String, String>,
}

impl RequestHead {
    /// Build a head from parsed HTTP parts. Cookies are extracted from
    /// the `Cookie` header here so the session layer never re-parses.
    pub fn new(method: Method, uri: &Uri, version: Version, headers: HeaderMap) -> Self {
        let cookies = parse_cookies(&headers);
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            version,
            protocol: Protocol::Http,
            headers,
            cookies,
        }
    }

    /// Convenience constructor for a GET request, used by tests and demos.
    pub fn get(path_and_query: &str) -> Self {
        let uri: Uri = path_and_query
            .parse()
            .unwrap_or_else(|_| Uri::from_static("/"));
        Self::new(Method::GET, &uri, Version::HTTP_11, HeaderMap::new())
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    /// Cookie value by name, when the client sent one.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Decoded query parameters in document order.
    pub fn query_params(&self) -> Vec<(String, String)> {
        match &self.query {
            Some(query) => url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
            None => Vec::new(),
        }
    }
}

fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            let pair = pair.trim();
            if let Some((name, value)) = pair.split_once('=') {
                cookies.insert(name.to_string(), value.to_string());
            }
        }
    }
    cookies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_decode() {
        let head = RequestHead::get("/?foo=bar&baz=a%20b");
        let params = head.query_params();
        assert_eq!(params[0], ("foo".to_string(), "bar".to_string()));
        assert_eq!(params[1], ("baz".to_string(), "a b".to_string()));
    }

    #[test]
    fn cookies_parsed_from_header() {
        let uri: Uri = "/".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("sid_cookie=abc; other=1"),
        );
        let head = RequestHead::new(Method::GET, &uri, Version::HTTP_11, headers);
        assert_eq!(head.cookie("sid_cookie"), Some("abc"));
        assert_eq!(head.cookie("other"), Some("1"));
        assert_eq!(head.cookie("missing"), None);
    }
}
