//! Shared domain types for chatlog.
//!
//! This crate contains the types that cross crate boundaries: transcript
//! messages, the two persisted document shapes (conversation and the legacy
//! chat session), chat widget events, the `/api/chat/log` wire contract,
//! configuration, and error enums.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod session;
pub mod transcript;
pub mod widget;
