//! HTTP layer for chatlog.
//!
//! Axum server exposing the transcript logging routes with CORS and
//! request tracing.

pub mod error;
pub mod handlers;
pub mod router;
