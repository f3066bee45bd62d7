//! Diagnostic HTTP echo service library.

pub mod config;
pub mod dns;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::schema::EchoConfig;
pub use http::EchoServer;
pub use lifecycle::Shutdown;
