//! Conversation document types.
//!
//! A conversation is the current persisted form of one chat session's
//! transcript. Field names follow the document store's schema
//! (`_id`, `_key`, camelCase fields) so these types serialize directly into
//! store documents.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::message::{MessageRole, TranscriptMessage};

/// Document `_type` of conversation records.
pub const CONVERSATION_TYPE: &str = "conversation";

/// Lifecycle status of a conversation.
///
/// Every write sets `Active`. Nothing in this system moves a conversation
/// to `Ended`; the variant exists because the studio schema allows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    #[default]
    Active,
    Ended,
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationStatus::Active => write!(f, "active"),
            ConversationStatus::Ended => write!(f, "ended"),
        }
    }
}

impl FromStr for ConversationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ConversationStatus::Active),
            "ended" => Ok(ConversationStatus::Ended),
            other => Err(format!("invalid conversation status: '{other}'")),
        }
    }
}

/// One entry of a conversation's `messages` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Array item key: the caller's message id, or a generated key. Entries
    /// written by older clients carry none and read back as empty.
    #[serde(rename = "_key", default)]
    pub key: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: String,
}

impl ConversationMessage {
    /// Project a transcript message into a conversation entry under `key`.
    pub fn from_transcript(message: &TranscriptMessage, key: String) -> Self {
        Self {
            key,
            role: message.role,
            content: message.content.clone(),
            timestamp: message.timestamp.clone(),
        }
    }
}

/// Optional request context recorded when a conversation is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Origin of the conversation (e.g. "website", "widget").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ConversationMetadata {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.user_agent.is_none() && self.ip_address.is_none() && self.source.is_none()
    }
}

/// A persisted conversation document.
///
/// Keyed externally by `session_id`; the store does not enforce uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub session_id: String,
    #[serde(default)]
    pub status: ConversationStatus,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<String>,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ConversationMetadata>,
}
