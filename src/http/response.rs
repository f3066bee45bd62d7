//! Response construction.
//!
//! # Responsibilities
//! - Build text, JSON and empty replies with the right content type
//! - Render `Set-Cookie` headers
//! - Convert a reply into exactly one HTTP response
//!
//! # Design Decisions
//! - JSON is serialized eagerly; a serialization failure becomes a 500
//! - String maps are `BTreeMap`, so JSON keys come out sorted

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::http::request::is_cookie_name;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplyBody {
    Text(String),
    Json(Vec<u8>),
    Empty,
}

/// A handler's answer to one request.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    body: ReplyBody,
    cookies: Vec<SetCookie>,
}

impl Reply {
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: ReplyBody::Text(body.into()),
            cookies: Vec::new(),
        }
    }

    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => Self {
                status,
                body: ReplyBody::Json(bytes),
                cookies: Vec::new(),
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize JSON reply");
                Self::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            body: ReplyBody::Empty,
            cookies: Vec::new(),
        }
    }

    pub fn not_found() -> Self {
        Self::text(StatusCode::NOT_FOUND, "404 page not found")
    }

    /// Attach a `Set-Cookie` header.
    pub fn with_cookie(mut self, cookie: SetCookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let (content_type, body) = match self.body {
            ReplyBody::Text(text) => (Some(TEXT_PLAIN), Body::from(text)),
            ReplyBody::Json(bytes) => (Some(APPLICATION_JSON), Body::from(bytes)),
            ReplyBody::Empty => (None, Body::empty()),
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        if let Some(content_type) = content_type {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        for cookie in self.cookies {
            if !is_cookie_name(&cookie.name) {
                tracing::warn!(cookie = %cookie.name, "Dropping cookie with invalid name");
                continue;
            }
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                }
                Err(e) => {
                    tracing::warn!(cookie = %cookie.name, error = %e, "Dropping unrenderable cookie");
                }
            }
        }
        response
    }
}

/// A cookie to set on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    name: String,
    value: String,
    max_age_secs: u64,
    path: String,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
}

impl SetCookie {
    /// A cookie with no attributes. The value is query-escaped on render.
    ///
    /// A name that is not a valid token is never sent.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_age_secs: 0,
            path: String::new(),
            domain: None,
            secure: false,
            http_only: false,
        }
    }

    pub fn max_age(mut self, secs: u64) -> Self {
        self.max_age_secs = secs;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Scope the cookie to a host. Any port is stripped; an empty or
    /// unusable host leaves the attribute off.
    pub fn domain(mut self, host: &str) -> Self {
        self.domain = cookie_domain(host);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for SetCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value: String = url::form_urlencoded::byte_serialize(self.value.as_bytes()).collect();
        write!(f, "{}={}", self.name, value)?;
        if !self.path.is_empty() {
            write!(f, "; Path={}", self.path)?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={domain}")?;
        }
        if self.max_age_secs > 0 {
            write!(f, "; Max-Age={}", self.max_age_secs)?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}

fn cookie_domain(host: &str) -> Option<String> {
    let host = host.trim();
    // Bracketed IPv6 literals cannot be cookie domains.
    if host.starts_with('[') {
        return None;
    }
    let name = host.rsplit_once(':').map_or(host, |(name, _port)| name);
    let name = name.strip_prefix('.').unwrap_or(name);
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.' || b == b'_');
    valid.then(|| name.to_string())
}
