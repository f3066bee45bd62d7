//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap external calls (DNS lookups) with a deadline
//! - Report expiry as a distinct error the caller can render
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Dropping the wrapped future is the only cancellation; blocking work
//!   already handed to the resolver thread pool runs to completion

use std::future::Future;
use std::time::Duration;

pub use tokio::time::error::Elapsed;

/// Await `future`, giving up after `deadline`.
pub async fn with_deadline<F>(deadline: Duration, future: F) -> Result<F::Output, Elapsed>
where
    F: Future,
{
    tokio::time::timeout(deadline, future).await
}
