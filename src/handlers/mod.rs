//! Route handlers and the standard route table.
//!
//! # Routes
//! ```text
//! GET  /                           Hello World!
//! GET  /ping                       pong
//! GET  /ip                         client address (source per variant)
//! GET  /ua                         User-Agent
//! GET  /headers                    request headers minus platform headers
//! GET  /loc                        platform geolocation headers
//! POST /post                       all headers + body
//! GET  /date                       RFC 3339 local time
//! GET  /timestamp                  Unix seconds
//! GET  /check_status               {"status":1}
//! GET  /cookies                    request cookies
//! GET  /cookie_set/:name/:cookie   set a cookie
//! GET  /generate_204               204 No Content
//! GET  /dns/:domains               first IPv4 per domain (standalone only)
//! ```

pub mod cookies;
pub mod echo;
pub mod lookup;
pub mod synthetic;

use crate::config::EchoConfig;
use crate::dns::DnsLimits;
use crate::http::request::RequestContext;
use crate::routing::{Router, RouterError};

/// Build the route table for the configured variant.
pub fn build_router(config: &EchoConfig) -> Result<Router, RouterError> {
    let ip_source = config.routes.client_ip_source();

    let mut router = Router::new();
    router
        .get("/", synthetic::hello)?
        .get("/ping", synthetic::ping)?
        .get("/ip", move |ctx: RequestContext| echo::ip(ctx, ip_source))?
        .get("/ua", echo::user_agent)?
        .get("/headers", echo::headers)?
        .get("/loc", echo::location)?
        .post("/post", echo::post)?
        .get("/date", synthetic::date)?
        .get("/timestamp", synthetic::timestamp)?
        .get("/check_status", synthetic::check_status)?
        .get("/cookies", cookies::list)?
        .get("/cookie_set/:name/:cookie", cookies::set)?
        .get("/generate_204", synthetic::generate_204)?;

    if config.routes.dns_enabled() {
        let limits = DnsLimits::from(&config.dns);
        router.get("/dns/:domains", move |ctx: RequestContext| {
            lookup::dns(ctx, limits)
        })?;
    }

    tracing::debug!(
        routes = router.len(),
        variant = %config.routes.variant,
        dns_enabled = config.routes.dns_enabled(),
        "Route table built"
    );
    Ok(router)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Bytes;
    use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
    use axum::response::IntoResponse;

    use crate::http::request::RequestContext;
    use crate::http::response::Reply;

    pub fn request(
        method: Method,
        path: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> RequestContext {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        RequestContext::new(
            method,
            path,
            map,
            body.map(|b| Bytes::from(b.to_string())),
            "127.0.0.1:40000".parse().unwrap(),
        )
    }

    pub fn get(path: &str) -> RequestContext {
        request(Method::GET, path, &[], Some(""))
    }

    pub async fn body_string(reply: Reply) -> String {
        let bytes = axum::body::to_bytes(reply.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub async fn body_json(reply: Reply) -> serde_json::Value {
        serde_json::from_str(&body_string(reply).await).unwrap()
    }
}
