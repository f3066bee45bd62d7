//! DNS lookups for the `/dns/:domains` route.
//!
//! # Data Flow
//! ```text
//! "a.com,b.org"
//!     → split on ',', dedup, reject lists over dns.max_domains
//!     → resolver.rs (one bounded lookup per domain, at most
//!       dns.max_concurrent in flight)
//!     → { domain: first IPv4 | "" | "ERR: <message>" }
//! ```

pub mod resolver;

pub use resolver::{resolve_all, resolve_each, resolve_first_ipv4, DnsError, DnsLimits};
