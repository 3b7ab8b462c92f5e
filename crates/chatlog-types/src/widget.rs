//! Chat widget callback events.
//!
//! The widget exposes several hooks that may fire for the same logical
//! message. Each hook's payload is modeled loosely (every field optional)
//! because the widget's shapes vary between versions. Serialized form is
//! internally tagged by `hook`, which is how the CLI relay reads them:
//!
//! ```json
//! {"hook": "onUserMessage", "text": "hi, I'm a@b.com", "id": "m1"}
//! ```

use serde::{Deserialize, Serialize};

/// A single callback invocation from the chat widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hook")]
pub enum WidgetEvent {
    /// Generic message hook. Role defaults to `user`.
    #[serde(rename = "onMessage")]
    Message(MessagePayload),
    /// User message hook.
    #[serde(rename = "onUserMessage")]
    UserMessage(TextPayload),
    /// Assistant response hook.
    #[serde(rename = "onResponse")]
    Response(TextPayload),
    /// Low-level thread stream event. Role defaults to `assistant`.
    #[serde(rename = "onThreadEvent")]
    ThreadEvent(ThreadEventPayload),
}

impl WidgetEvent {
    /// Hook name, for log fields.
    pub fn hook(&self) -> &'static str {
        match self {
            WidgetEvent::Message(_) => "onMessage",
            WidgetEvent::UserMessage(_) => "onUserMessage",
            WidgetEvent::Response(_) => "onResponse",
            WidgetEvent::ThreadEvent(_) => "onThreadEvent",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        rename = "messageId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadEventPayload {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ThreadMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

impl ThreadEventPayload {
    /// Text of the first content part of the embedded message, if any.
    pub fn first_part_text(&self) -> Option<&str> {
        self.message
            .as_ref()?
            .content
            .first()?
            .text
            .as_ref()?
            .value
            .as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Vec<ThreadContentPart>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ThreadText>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_hooks() {
        let ev: WidgetEvent =
            serde_json::from_str(r#"{"hook":"onMessage","text":"hey","messageId":"x"}"#).unwrap();
        match ev {
            WidgetEvent::Message(p) => {
                assert_eq!(p.text.as_deref(), Some("hey"));
                assert_eq!(p.message_id.as_deref(), Some("x"));
                assert!(p.role.is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let ev: WidgetEvent = serde_json::from_str(r#"{"hook":"onResponse"}"#).unwrap();
        assert_eq!(ev.hook(), "onResponse");
    }

    #[test]
    fn test_thread_event_first_part_text() {
        let ev: WidgetEvent = serde_json::from_str(
            r#"{"hook":"onThreadEvent","type":"thread.message",
                "message":{"role":"user","content":[{"text":{"value":"first"}},{"text":{"value":"second"}}]}}"#,
        )
        .unwrap();
        let WidgetEvent::ThreadEvent(payload) = ev else {
            panic!("expected thread event");
        };
        assert_eq!(payload.kind.as_deref(), Some("thread.message"));
        assert_eq!(payload.first_part_text(), Some("first"));
    }

    #[test]
    fn test_thread_event_without_message() {
        let payload = ThreadEventPayload {
            delta: Some("partial".to_string()),
            ..Default::default()
        };
        assert!(payload.first_part_text().is_none());
    }
}
