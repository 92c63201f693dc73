//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → identity.rs (derive client key from forwarded headers)
//!     → rate_limit.rs (fixed-window admission check per key)
//!     → Pass to handler, or reject with 429
//! ```
//!
//! # Design Decisions
//! - Admission control happens before any handler work
//! - The limiter never fails a request for reasons other than the limit
//!   itself; malformed headers degrade to placeholder identities
//! - Rejection is an expected result, not an error

pub mod identity;
pub mod rate_limit;

pub use identity::client_identity;
pub use rate_limit::{Decision, FixedWindowLimiter, Sweeper};
