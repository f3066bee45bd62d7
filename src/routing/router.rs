//! Route table and dispatch.
//!
//! # Responsibilities
//! - Store routes in registration order
//! - Look up the first route matching method and path
//! - Invoke the matched handler with its path parameters bound
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc, no locks)
//! - Registering the same (method, pattern) twice is an error
//! - A wrong method is a plain 404, like any other miss
//! - O(n) scan over routes (acceptable for a handful of routes)

use std::future::Future;

use axum::http::Method;
use futures_util::future::BoxFuture;

use crate::http::request::RequestContext;
use crate::http::response::Reply;
use crate::routing::matcher::{Params, PathPattern, PatternError};

/// Future returned by a handler.
pub type HandlerFuture = BoxFuture<'static, Reply>;

/// Logic executed for a matched route.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: RequestContext) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    fn call(&self, ctx: RequestContext) -> HandlerFuture {
        Box::pin(self(ctx))
    }
}

/// Error returned when a route cannot be registered.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    #[error("route {method} {pattern} is already registered")]
    DuplicateRoute { method: Method, pattern: String },
}

/// A registered (method, pattern) pair and its handler.
pub struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Box<dyn Handler>,
}

impl Route {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Result of a successful route lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Params,
}

/// Ordered, immutable-after-startup route table.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. Fails on a malformed pattern or a duplicate registration.
    pub fn register<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, RouterError> {
        let pattern = PathPattern::parse(pattern)?;
        if self
            .routes
            .iter()
            .any(|r| r.method == method && r.pattern == pattern)
        {
            return Err(RouterError::DuplicateRoute {
                method,
                pattern: pattern.as_str().to_string(),
            });
        }

        tracing::debug!(method = %method, pattern = %pattern, "Route registered");
        self.routes.push(Route {
            method,
            pattern,
            handler: Box::new(handler),
        });
        Ok(self)
    }

    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouterError> {
        self.register(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouterError> {
        self.register(Method::POST, pattern, handler)
    }

    /// Find the first route whose method and pattern match.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route
                    .pattern
                    .captures(path)
                    .map(|params| RouteMatch { route, params })
            })
    }

    /// Run the matching handler, or answer 404 when nothing matches.
    pub async fn dispatch(&self, ctx: RequestContext) -> Reply {
        self.dispatch_with_route(ctx).await.1
    }

    /// Like [`Router::dispatch`], also reporting which pattern matched.
    pub async fn dispatch_with_route(&self, ctx: RequestContext) -> (Option<&PathPattern>, Reply) {
        match self.match_route(ctx.method(), ctx.path()) {
            Some(RouteMatch { route, params }) => {
                let future = route.handler.call(ctx.with_params(params));
                (Some(&route.pattern), future.await)
            }
            None => (None, Reply::not_found()),
        }
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;

    fn ctx(method: Method, path: &str) -> RequestContext {
        RequestContext::new(
            method,
            path,
            HeaderMap::new(),
            None,
            "127.0.0.1:5000".parse().unwrap(),
        )
    }

    async fn body(reply: Reply) -> String {
        let response = reply.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn echo_param(name: &'static str) -> impl Handler {
        move |ctx: RequestContext| async move { Reply::text(StatusCode::OK, ctx.param(name)) }
    }

    #[tokio::test]
    async fn test_dispatch_binds_params() {
        let mut router = Router::new();
        router.get("/hello/:who", echo_param("who")).unwrap();

        let reply = router.dispatch(ctx(Method::GET, "/hello/world")).await;
        assert_eq!(reply.status(), StatusCode::OK);
        assert_eq!(body(reply).await, "world");
    }

    #[tokio::test]
    async fn test_unmatched_is_404() {
        let mut router = Router::new();
        router.get("/ping", echo_param("none")).unwrap();

        let reply = router.dispatch(ctx(Method::GET, "/pong")).await;
        assert_eq!(reply.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(reply).await, "404 page not found");
    }

    #[tokio::test]
    async fn test_wrong_method_is_404() {
        let mut router = Router::new();
        router.post("/post", echo_param("none")).unwrap();

        let reply = router.dispatch(ctx(Method::GET, "/post")).await;
        assert_eq!(reply.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let mut router = Router::new();
        router
            .get("/a/:x", |_ctx: RequestContext| async {
                Reply::text(StatusCode::OK, "param")
            })
            .unwrap()
            .get("/a/b", |_ctx: RequestContext| async {
                Reply::text(StatusCode::OK, "static")
            })
            .unwrap();

        assert_eq!(body(router.dispatch(ctx(Method::GET, "/a/b")).await).await, "param");
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let mut router = Router::new();
        router.get("/ping", echo_param("x")).unwrap();
        let err = router.get("/ping", echo_param("x")).unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRoute { .. }));
        assert_eq!(err.to_string(), "route GET /ping is already registered");

        // Same pattern, different method is a different route.
        router.post("/ping", echo_param("x")).unwrap();
        assert_eq!(router.len(), 2);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut router = Router::new();
        let err = router.get("ping", echo_param("x")).unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern(_)));
        assert!(router.is_empty());
    }

    #[test]
    fn test_match_route_reports_pattern() {
        let mut router = Router::new();
        router.get("/dns/:domains", echo_param("domains")).unwrap();

        let matched = router.match_route(&Method::GET, "/dns/a.com").unwrap();
        assert_eq!(matched.route.pattern().as_str(), "/dns/:domains");
        assert_eq!(matched.params.get("domains"), Some("a.com"));
        assert!(router.match_route(&Method::GET, "/dns").is_none());
    }
}
