//! Widget event → message normalization.
//!
//! Role defaults differ by hook: the generic `onMessage` hook defaults to
//! `user`, thread events default to `assistant`. Timestamps and generated
//! ids are added by the engine, not here.

use chatlog_types::message::MessageRole;
use chatlog_types::widget::{MessagePayload, ThreadEventPayload, WidgetEvent};

/// The parts of a message extracted from one widget event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMessage {
    pub role: MessageRole,
    pub content: String,
    /// Id carried by the event, if any.
    pub message_id: Option<String>,
}

/// Extract a message from a widget event.
///
/// Returns `None` only for thread events without any text; the other hooks
/// always produce a message, possibly with empty content.
pub fn normalize(event: &WidgetEvent) -> Option<NormalizedMessage> {
    match event {
        WidgetEvent::Message(payload) => Some(from_message(payload)),
        WidgetEvent::UserMessage(payload) => Some(NormalizedMessage {
            role: MessageRole::User,
            content: payload.text.clone().unwrap_or_default(),
            message_id: non_empty(payload.id.as_deref()),
        }),
        WidgetEvent::Response(payload) => Some(NormalizedMessage {
            role: MessageRole::Assistant,
            content: payload.text.clone().unwrap_or_default(),
            message_id: non_empty(payload.id.as_deref()),
        }),
        WidgetEvent::ThreadEvent(payload) => from_thread_event(payload),
    }
}

fn from_message(payload: &MessagePayload) -> NormalizedMessage {
    let content = non_empty(payload.content.as_deref())
        .or_else(|| non_empty(payload.text.as_deref()))
        .unwrap_or_default();
    let role = match payload.role.as_deref() {
        Some(r) if r.eq_ignore_ascii_case("assistant") => MessageRole::Assistant,
        _ => MessageRole::User,
    };
    NormalizedMessage {
        role,
        content,
        message_id: non_empty(payload.id.as_deref())
            .or_else(|| non_empty(payload.message_id.as_deref())),
    }
}

fn from_thread_event(payload: &ThreadEventPayload) -> Option<NormalizedMessage> {
    let text = non_empty(payload.first_part_text())
        .or_else(|| non_empty(payload.output_text.as_deref()))
        .or_else(|| non_empty(payload.delta.as_deref()))?;
    let role = payload
        .message
        .as_ref()
        .and_then(|m| m.role.as_deref())
        .and_then(|r| match r {
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            _ => None,
        })
        .unwrap_or(MessageRole::Assistant);
    Some(NormalizedMessage {
        role,
        content: text,
        message_id: None,
    })
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlog_types::widget::{TextPayload, ThreadContentPart, ThreadMessage, ThreadText};

    #[test]
    fn message_hook_defaults_to_user_and_prefers_content() {
        let ev = WidgetEvent::Message(MessagePayload {
            content: Some("from content".to_string()),
            text: Some("from text".to_string()),
            message_id: Some("mid".to_string()),
            ..Default::default()
        });
        let msg = normalize(&ev).unwrap();
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "from content");
        assert_eq!(msg.message_id.as_deref(), Some("mid"));
    }

    #[test]
    fn message_hook_falls_back_to_text_and_id() {
        let ev = WidgetEvent::Message(MessagePayload {
            role: Some("assistant".to_string()),
            content: Some(String::new()),
            text: Some("from text".to_string()),
            id: Some("id1".to_string()),
            message_id: Some("ignored".to_string()),
        });
        let msg = normalize(&ev).unwrap();
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.content, "from text");
        assert_eq!(msg.message_id.as_deref(), Some("id1"));
    }

    #[test]
    fn message_hook_keeps_empty_content() {
        let msg = normalize(&WidgetEvent::Message(MessagePayload::default())).unwrap();
        assert_eq!(msg.content, "");
        assert!(msg.message_id.is_none());
    }

    #[test]
    fn dedicated_hooks_fix_role() {
        let payload = TextPayload {
            text: Some("hi".to_string()),
            id: None,
        };
        let user = normalize(&WidgetEvent::UserMessage(payload.clone())).unwrap();
        assert_eq!(user.role, MessageRole::User);
        let assistant = normalize(&WidgetEvent::Response(payload)).unwrap();
        assert_eq!(assistant.role, MessageRole::Assistant);
    }

    #[test]
    fn thread_event_text_precedence_and_role() {
        let ev = WidgetEvent::ThreadEvent(ThreadEventPayload {
            kind: Some("thread.item.done".to_string()),
            message: Some(ThreadMessage {
                role: Some("user".to_string()),
                content: vec![ThreadContentPart {
                    text: Some(ThreadText {
                        value: Some("part".to_string()),
                    }),
                }],
            }),
            output_text: Some("output".to_string()),
            delta: None,
        });
        let msg = normalize(&ev).unwrap();
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "part");
        assert!(msg.message_id.is_none());
    }

    #[test]
    fn thread_event_defaults_to_assistant() {
        let ev = WidgetEvent::ThreadEvent(ThreadEventPayload {
            message: Some(ThreadMessage {
                role: Some("system".to_string()),
                content: Vec::new(),
            }),
            delta: Some("tok".to_string()),
            ..Default::default()
        });
        let msg = normalize(&ev).unwrap();
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.content, "tok");
    }

    #[test]
    fn thread_event_without_text_is_ignored() {
        let ev = WidgetEvent::ThreadEvent(ThreadEventPayload {
            kind: Some("thread.started".to_string()),
            ..Default::default()
        });
        assert!(normalize(&ev).is_none());
    }
}
