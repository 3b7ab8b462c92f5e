//! Transcript message types.
//!
//! A `TranscriptMessage` is the canonical record the relay produces from
//! widget events and the shape the backend receives in `/api/chat/log`.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single chat message as captured from the widget.
///
/// Immutable once created. `timestamp` is kept as the ISO-8601 string the
/// relay produced so it round-trips into the store byte-for-byte.
/// `message_id` is optional on the wire; the server generates a key when it
/// is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl TranscriptMessage {
    /// Build a message with an explicit id.
    pub fn new(
        role: MessageRole,
        content: impl Into<String>,
        timestamp: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
            message_id: Some(message_id.into()),
        }
    }
}
