//! Toolbox API server library.
//!
//! HTTP backend for a catalog of self-contained utility tools. Every
//! endpoint is a thin wrapper: validate the input, delegate to a library
//! or a third-party service, and map failures to HTTP statuses uniformly.
//! Admission control (per-client fixed-window rate limiting) guards the
//! whole surface.

pub mod config;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod services;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
