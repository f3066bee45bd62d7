//! Request context handed to route handlers.
//!
//! # Responsibilities
//! - Buffer the request body (bounded) once, before dispatch
//! - Parse cookies out of every `Cookie` header
//! - Expose headers, peer address and path parameters read-only
//!
//! # Design Decisions
//! - The context is immutable once built; handlers take it by value
//! - An unreadable or oversized body becomes `None`, never an error

use std::net::SocketAddr;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request};

use crate::routing::Params;

/// A single request cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Everything a handler may look at for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    path: String,
    headers: HeaderMap,
    cookies: Vec<Cookie>,
    body: Option<Bytes>,
    remote_addr: SocketAddr,
    params: Params,
}

impl RequestContext {
    /// Build a context from parts that are already in memory.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        headers: HeaderMap,
        body: Option<Bytes>,
        remote_addr: SocketAddr,
    ) -> Self {
        let cookies = parse_cookies(&headers);
        Self {
            method,
            path: path.into(),
            headers,
            cookies,
            body,
            remote_addr,
            params: Params::default(),
        }
    }

    /// Consume an incoming request, reading at most `max_body_bytes` of body.
    pub async fn from_request(
        request: Request<Body>,
        remote_addr: SocketAddr,
        max_body_bytes: usize,
    ) -> Self {
        let (parts, body) = request.into_parts();
        let body = match axum::body::to_bytes(body, max_body_bytes).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::debug!(error = %e, path = %parts.uri.path(), "Request body unreadable");
                None
            }
        };
        Self::new(parts.method, parts.uri.path(), parts.headers, body, remote_addr)
    }

    /// Attach the bindings of the matched route.
    pub(crate) fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header as text, or `""` when absent or not UTF-8.
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    /// The `Host` header, if any.
    pub fn host(&self) -> Option<&str> {
        self.headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Raw body bytes; `None` if reading the body failed.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Path parameter bound by the matched route; `""` if undeclared.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).unwrap_or("")
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// Parse every `Cookie` header into ordered name/value pairs.
pub fn parse_cookies(headers: &HeaderMap) -> Vec<Cookie> {
    let mut cookies = Vec::new();
    for line in headers.get_all(header::COOKIE) {
        let Ok(line) = line.to_str() else { continue };
        for part in line.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (name, value) = part.split_once('=').unwrap_or((part, ""));
            let name = name.trim();
            if !is_cookie_name(name) {
                continue;
            }
            let Some(value) = parse_cookie_value(value) else {
                continue;
            };
            cookies.push(Cookie {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }
    cookies
}

/// Cookie names are RFC 7230 tokens.
pub(crate) fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

/// Strip one pair of surrounding quotes and reject invalid octets.
fn parse_cookie_value(raw: &str) -> Option<&str> {
    let value = raw
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(raw);
    value
        .bytes()
        .all(|b| (0x20..0x7f).contains(&b) && b != b'"' && b != b';' && b != b'\\')
        .then_some(value)
}
