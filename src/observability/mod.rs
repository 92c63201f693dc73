//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured log lines, request IDs attached)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Metrics are cheap (atomic increments behind the `metrics` macros)
//! - The exporter runs on its own listener, separate from the API port
//! - Low-cardinality labels only: matched route templates, not raw paths

pub mod metrics;
