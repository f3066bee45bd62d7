//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route lookup, first match wins)
//!     → matcher.rs (segment-wise pattern match, parameter binding)
//!     → Return: handler reply, or 404 on no match
//!
//! Route Registration (at startup):
//!     (method, "/pattern/:param", handler)
//!     → Parse pattern into static/param segments
//!     → Reject duplicates
//!     → Freeze as immutable Router behind Arc
//! ```

pub mod matcher;
pub mod router;

pub use matcher::{Params, PathPattern, PatternError};
pub use router::{Handler, HandlerFuture, Route, RouteMatch, Router, RouterError};
