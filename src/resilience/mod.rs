//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! External call (DNS lookup):
//!     → timeouts.rs (enforce per-call deadline)
//!     → On expiry: caller renders the failure for that item only
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: a failed lookup is reported, not repeated

pub mod timeouts;

pub use timeouts::with_deadline;
