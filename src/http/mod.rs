//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → security layer (rate limiting per endpoint class)
//!     → handler (validate, delegate, respond)
//!     → error.rs (uniform failure-to-status mapping)
//! ```

pub mod error;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use request::MakeRequestUuid;
pub use server::{AppState, HttpServer};
