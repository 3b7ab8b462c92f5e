//! Transcript event relay.
//!
//! Turns chat widget callback events into [`TranscriptMessage`]s, keeps the
//! session's append-only history, and forwards the whole history to the
//! backend on every new message.
//!
//! Several widget hooks can fire for one logical message. Each is
//! normalized and appended independently; there is no deduplication, so a
//! message can appear more than once in the history and in every later POST.
//!
//! [`TranscriptMessage`]: chatlog_types::message::TranscriptMessage

pub mod email;
pub mod engine;
pub mod normalize;
pub mod ports;

pub use engine::{RelayOutcome, TranscriptRelay};
pub use ports::{EmailStore, TranscriptSink};

/// Local storage key holding the captured user email.
pub const EMAIL_STORAGE_KEY: &str = "chatUserEmail";
