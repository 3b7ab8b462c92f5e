//! Infrastructure layer for chatlog.
//!
//! Contains implementations of the ports defined in `chatlog-core`: the
//! Sanity HTTP document store, an in-memory document store, the relay's HTTP
//! sink and file-backed email storage, plus configuration loading.

pub mod config;
pub mod filesystem;
pub mod memory;
pub mod relay_http;
pub mod sanity;
pub mod store;
