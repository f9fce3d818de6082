//! Reply produced by the dispatch core.
//!
//! # Responsibilities
//! - Carry status, headers, and body back to the transport layer
//! - Provide the canonical not-found / redirect / error shapes
//! - Convert into an axum response at the adapter boundary
//!
//! # Design Decisions
//! - Plain owned value; the core never touches a socket
//! - Error detail is decided by the caller (`exception_details` gate),
//!   the reply just renders what it is given

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// An already-built response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Reply {
    /// 200 with a text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Same reply with a different status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// The normal no-route outcome.
    pub fn not_found(path: &str) -> Self {
        Self::text(format!("No route matches {path}")).with_status(StatusCode::NOT_FOUND)
    }

    /// Redirect reply: 301 for permanent moves, 302 otherwise.
    pub fn redirect(location: &str, permanent: bool) -> Self {
        let status = if permanent {
            StatusCode::MOVED_PERMANENTLY
        } else {
            StatusCode::FOUND
        };
        let mut reply = Self::text("").with_status(status);
        if let Ok(value) = HeaderValue::from_str(location) {
            reply.headers.insert(header::LOCATION, value);
        }
        reply
    }

    /// 500 with detail only when the caller allows it.
    pub fn server_error(detail: &str, verbose: bool) -> Self {
        let body = if verbose {
            format!("Internal error: {detail}")
        } else {
            "Internal error".to_string()
        };
        Self::text(body).with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Append a `Set-Cookie` header (one per session ticket).
    pub fn add_cookie(&mut self, name: &str, value: &str) {
        if let Ok(header_value) = HeaderValue::from_str(&format!("{name}={value}; Path=/")) {
            self.headers.append(header::SET_COOKIE, header_value);
        }
    }

    /// `Location` header, when present and readable.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Set-Cookie values, for introspection in tests.
    pub fn cookies(&self) -> Vec<&str> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response.into_response()
    }
}
