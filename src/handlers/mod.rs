//! Route handlers.
//!
//! Every handler follows the same shape: deserialize a typed request,
//! apply cheap semantic checks, delegate to a library or service client,
//! return typed JSON. Failures all flow through [`crate::http::ApiError`].

pub mod contact;
pub mod encode;
pub mod hash;
pub mod health;
pub mod image;
pub mod json;
pub mod pagespeed;
