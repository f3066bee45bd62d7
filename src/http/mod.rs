//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all route)
//!     → request.rs (buffer body, parse cookies → RequestContext)
//!     → routing::Router (match, bind params, run handler)
//!     → response.rs (Reply → HTTP response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{Cookie, RequestContext};
pub use response::{Reply, SetCookie};
pub use server::{AppState, EchoServer};
