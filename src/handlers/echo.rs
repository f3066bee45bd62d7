//! Routes that reflect request metadata back to the client.

use std::borrow::Cow;
use std::collections::BTreeMap;

use axum::http::{header, HeaderMap, HeaderName, StatusCode};

use crate::config::ClientIpSource;
use crate::http::request::RequestContext;
use crate::http::response::Reply;

/// Header name prefixes injected by the hosting platform.
pub const PLATFORM_HEADER_PREFIXES: [&str; 3] = ["X-Appengine", "X-Cloud", "X-Google"];

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Best guess at the client address for the configured source.
pub fn client_ip(ctx: &RequestContext, source: ClientIpSource) -> String {
    if source == ClientIpSource::ForwardedFor {
        let forwarded = ctx.header(X_FORWARDED_FOR);
        if !forwarded.is_empty() {
            return forwarded.to_string();
        }
    }
    ctx.remote_addr().ip().to_string()
}

pub async fn ip(ctx: RequestContext, source: ClientIpSource) -> Reply {
    Reply::text(StatusCode::OK, client_ip(&ctx, source))
}

pub async fn user_agent(ctx: RequestContext) -> Reply {
    Reply::text(StatusCode::OK, ctx.header(header::USER_AGENT.as_str()))
}

/// All request headers except the platform-injected ones.
pub async fn headers(ctx: RequestContext) -> Reply {
    let map = header_map(ctx.headers(), |name| !is_platform_header(name));
    Reply::json(StatusCode::OK, &map)
}

pub async fn location(ctx: RequestContext) -> Reply {
    let mut map = BTreeMap::new();
    map.insert("city", ctx.header("x-appengine-city"));
    map.insert("citylatlong", ctx.header("x-appengine-citylatlong"));
    map.insert("country", ctx.header("x-appengine-country"));
    Reply::json(StatusCode::OK, &map)
}

/// All request headers, unfiltered, plus the body as text.
pub async fn post(ctx: RequestContext) -> Reply {
    let mut map = header_map(ctx.headers(), |_| true);
    if let Some(body) = ctx.body() {
        map.insert("body".to_string(), String::from_utf8_lossy(body).into_owned());
    }
    Reply::json(StatusCode::OK, &map)
}

pub fn is_platform_header(canonical_name: &str) -> bool {
    PLATFORM_HEADER_PREFIXES
        .iter()
        .any(|prefix| canonical_name.starts_with(prefix))
}

/// Render headers keyed by canonical name, joining repeated values with ','.
///
/// `Host` and `Transfer-Encoding` describe the connection rather than the
/// request and are left out.
pub fn header_map(headers: &HeaderMap, keep: impl Fn(&str) -> bool) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for name in headers.keys() {
        if name == header::HOST || name == header::TRANSFER_ENCODING {
            continue;
        }
        let key = canonical_name(name);
        if !keep(&key) {
            continue;
        }
        let values: Vec<Cow<'_, str>> = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
            .collect();
        map.insert(key, values.join(","));
    }
    map
}

/// `x-forwarded-for` → `X-Forwarded-For`.
pub fn canonical_name(name: &HeaderName) -> String {
    let mut upper = true;
    name.as_str()
        .chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}
