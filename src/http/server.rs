//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app: one catch-all route feeding the echo Router
//! - Wire up middleware (tracing, panic recovery, request timeout)
//! - Bind server to listener and serve until shutdown
//! - Record per-request metrics

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::EchoConfig;
use crate::handlers::build_router;
use crate::http::request::RequestContext;
use crate::lifecycle::shutdown;
use crate::observability::metrics::{self, UNMATCHED_ROUTE};
use crate::routing::{Router as EchoRouter, RouterError};

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<EchoRouter>,
    pub max_body_bytes: usize,
}

/// HTTP server for the echo service.
pub struct EchoServer {
    app: axum::Router,
    config: EchoConfig,
}

impl EchoServer {
    /// Create a server with the standard route table for the configured variant.
    pub fn new(config: EchoConfig) -> Result<Self, RouterError> {
        let router = build_router(&config)?;
        Ok(Self::with_router(config, router))
    }

    /// Create a server around a prepared route table.
    pub fn with_router(config: EchoConfig, router: EchoRouter) -> Self {
        let state = AppState {
            router: Arc::new(router),
            max_body_bytes: config.limits.max_body_bytes,
        };
        let app = build_app(&config, state);
        Self { app, config }
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            variant = %self.config.routes.variant,
            "HTTP server starting"
        );

        let app = self.app.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &EchoConfig {
        &self.config
    }
}

/// Build the Axum app with all middleware layers.
#[allow(deprecated)]
pub fn build_app(config: &EchoConfig, state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/{*path}", any(dispatch_handler))
        .route("/", any(dispatch_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                ))),
        )
}

/// Hands every request to the echo Router.
async fn dispatch_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let ctx = RequestContext::from_request(request, addr, state.max_body_bytes).await;
    let method = ctx.method().clone();
    let path = ctx.path().to_string();

    let (pattern, reply) = state.router.dispatch_with_route(ctx).await;
    let route = pattern.map_or(UNMATCHED_ROUTE, |p| p.as_str());
    let status = reply.status();

    tracing::debug!(
        method = %method,
        path = %path,
        route = %route,
        status = status.as_u16(),
        "Request handled"
    );
    metrics::record_request(&method, route, status.as_u16(), start_time);

    reply.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{header, Method, StatusCode};
    use tower::ServiceExt;

    use crate::http::response::Reply;

    fn app_with(config: &EchoConfig, router: EchoRouter) -> axum::Router {
        let state = AppState {
            router: Arc::new(router),
            max_body_bytes: config.limits.max_body_bytes,
        };
        build_app(config, state).layer(MockConnectInfo(SocketAddr::from(([192, 0, 2, 10], 51000))))
    }

    fn standard_app() -> axum::Router {
        let config = EchoConfig::default();
        let router = build_router(&config).unwrap();
        app_with(&config, router)
    }

    async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn explode(_ctx: RequestContext) -> Reply {
        panic!("handler blew up")
    }

    #[tokio::test]
    async fn test_root_and_ping() {
        assert_eq!(send(standard_app(), get("/")).await, (StatusCode::OK, "Hello World!".into()));
        assert_eq!(send(standard_app(), get("/ping")).await, (StatusCode::OK, "pong".into()));
    }

    #[tokio::test]
    async fn test_ip_uses_peer_address() {
        let (status, body) = send(standard_app(), get("/ip")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "192.0.2.10");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (status, body) = send(standard_app(), get("/nope/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "404 page not found");
    }

    #[tokio::test]
    async fn test_post_round_trip() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/post")
            .header("X-Trace", "t-1")
            .body(Body::from("hello"))
            .unwrap();
        let (status, body) = send(standard_app(), request).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["body"], "hello");
        assert_eq!(json["X-Trace"], "t-1");
    }

    #[tokio::test]
    async fn test_oversized_post_omits_body() {
        let mut config = EchoConfig::default();
        config.limits.max_body_bytes = 4;
        let router = build_router(&config).unwrap();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/post")
            .body(Body::from("far too long"))
            .unwrap();
        let (status, body) = send(app_with(&config, router), request).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json.get("body").is_none());
    }

    #[tokio::test]
    async fn test_set_cookie_header() {
        let request = Request::builder()
            .uri("/cookie_set/foo/bar")
            .header(header::HOST, "localhost:9000")
            .body(Body::empty())
            .unwrap();
        let response = standard_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("foo=bar;"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("Domain=localhost"));
        assert!(cookie.contains("Secure"));
        assert!(!cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_panic_becomes_500() {
        let config = EchoConfig::default();
        let mut router = EchoRouter::new();
        router.get("/boom", explode).unwrap();
        router
            .get("/ping", crate::handlers::synthetic::ping)
            .unwrap();
        let app = app_with(&config, router);

        let (status, _) = send(app.clone(), get("/boom")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        // The same app keeps serving.
        assert_eq!(send(app, get("/ping")).await.0, StatusCode::OK);
    }
}
