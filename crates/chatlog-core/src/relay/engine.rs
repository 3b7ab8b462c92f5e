//! The relay state machine.
//!
//! One `TranscriptRelay` owns one chat session's state. Each widget event is
//! handled to completion before the next; delivery failures are logged and
//! dropped, leaving the backend copy stale until the next message.

use chatlog_types::message::{MessageRole, TranscriptMessage};
use chatlog_types::transcript::LogRequest;
use chatlog_types::widget::WidgetEvent;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::ids;
use crate::relay::email::find_email;
use crate::relay::normalize::normalize;
use crate::relay::ports::{EmailStore, TranscriptSink};

/// What handling one widget event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The event carried no message.
    Ignored,
    /// A message was appended and the history was sent.
    Appended { message_id: String, delivered: bool },
    /// The user's email was captured from this message. A bootstrap message
    /// was appended and sent under the new email; the host page must
    /// reload to pick up the email.
    EmailCaptured { email: String, delivered: bool },
}

impl RelayOutcome {
    pub fn reload_requested(&self) -> bool {
        matches!(self, RelayOutcome::EmailCaptured { .. })
    }
}

/// Per-session relay from widget events to the logging endpoint.
pub struct TranscriptRelay<T, E, C>
where
    T: TranscriptSink,
    E: EmailStore,
    C: Clock,
{
    session_id: String,
    history: Vec<TranscriptMessage>,
    user_email: String,
    needs_email: bool,
    pending_email: String,
    sink: T,
    email_store: E,
    clock: C,
}

impl<T, E, C> TranscriptRelay<T, E, C>
where
    T: TranscriptSink,
    E: EmailStore,
    C: Clock,
{
    /// Start a session.
    ///
    /// The user email is `page_email` when given, else the one saved in
    /// local storage, else unknown. A session id is generated when `None`.
    /// `pending_email` is sent while the email is unknown.
    pub async fn start(
        session_id: Option<String>,
        page_email: Option<String>,
        pending_email: impl Into<String>,
        sink: T,
        email_store: E,
        clock: C,
    ) -> Self {
        let session_id = session_id
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| ids::session_id(clock.now_millis()));

        let saved = match email_store.load().await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "Failed to read saved email, prompting again");
                None
            }
        };
        let user_email = page_email
            .filter(|e| !e.is_empty())
            .or(saved.filter(|e| !e.is_empty()))
            .unwrap_or_default();
        let needs_email = user_email.is_empty();

        info!(session_id = %session_id, needs_email, "Relay session started");

        Self {
            session_id,
            history: Vec::new(),
            user_email,
            needs_email,
            pending_email: pending_email.into(),
            sink,
            email_store,
            clock,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn history(&self) -> &[TranscriptMessage] {
        &self.history
    }

    /// The known user email, if any.
    pub fn user_email(&self) -> Option<&str> {
        (!self.user_email.is_empty()).then_some(self.user_email.as_str())
    }

    pub fn needs_email(&self) -> bool {
        self.needs_email
    }

    /// Handle one widget event.
    pub async fn handle(&mut self, event: &WidgetEvent) -> RelayOutcome {
        let Some(normalized) = normalize(event) else {
            debug!(hook = event.hook(), "Widget event carried no message");
            return RelayOutcome::Ignored;
        };

        if self.needs_email && normalized.role == MessageRole::User {
            if let Some(email) = find_email(&normalized.content).map(str::to_string) {
                // The bootstrap carries this message; it is not appended again.
                return self.capture_email(email, normalized.content).await;
            }
        }

        let message_id = normalized
            .message_id
            .unwrap_or_else(|| ids::message_id(self.clock.now_millis()));
        let message = TranscriptMessage::new(
            normalized.role,
            normalized.content,
            self.clock.now_iso(),
            message_id.clone(),
        );
        self.history.push(message);
        debug!(
            hook = event.hook(),
            message_id = %message_id,
            history_len = self.history.len(),
            "Appended to history"
        );

        let email = if self.user_email.is_empty() {
            self.pending_email.clone()
        } else {
            self.user_email.clone()
        };
        let delivered = self.send_history(&email, event.hook()).await;
        RelayOutcome::Appended {
            message_id,
            delivered,
        }
    }

    /// Record the email, persist it, and bootstrap the conversation with
    /// the message that contained it.
    async fn capture_email(&mut self, email: String, content: String) -> RelayOutcome {
        info!(session_id = %self.session_id, "Captured user email");
        self.user_email = email.clone();
        self.needs_email = false;
        if let Err(e) = self.email_store.save(&email).await {
            warn!(error = %e, "Failed to persist captured email");
        }

        let bootstrap = TranscriptMessage::new(
            MessageRole::User,
            content,
            self.clock.now_iso(),
            ids::message_id(self.clock.now_millis()),
        );
        self.history.push(bootstrap);

        let delivered = self.send_history(&email, "email-captured").await;
        RelayOutcome::EmailCaptured { email, delivered }
    }

    /// POST the full history. Failures are logged and swallowed.
    async fn send_history(&self, email: &str, hook: &str) -> bool {
        let request = LogRequest::new(email, self.session_id.as_str(), self.history.clone());
        match self.sink.deliver(&request).await {
            Ok(()) => {
                debug!(
                    hook,
                    session_id = %self.session_id,
                    message_count = self.history.len(),
                    "History delivered"
                );
                true
            }
            Err(e) => {
                warn!(
                    hook,
                    session_id = %self.session_id,
                    error = %e,
                    "Failed to deliver history"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chatlog_types::error::RelayError;
    use chatlog_types::widget::{MessagePayload, TextPayload, ThreadEventPayload};

    use super::*;
    use crate::clock::FixedClock;

    // --- Mocks ---

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<LogRequest>>,
        fail: bool,
    }

    impl TranscriptSink for RecordingSink {
        async fn deliver(&self, request: &LogRequest) -> Result<(), RelayError> {
            self.sent.lock().unwrap().push(request.clone());
            if self.fail {
                Err(RelayError::Status {
                    status: 500,
                    body: "down".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct MemoryEmailStore {
        value: Mutex<Option<String>>,
    }

    impl MemoryEmailStore {
        fn with(email: &str) -> Self {
            Self {
                value: Mutex::new(Some(email.to_string())),
            }
        }
    }

    impl EmailStore for MemoryEmailStore {
        async fn load(&self) -> Result<Option<String>, RelayError> {
            Ok(self.value.lock().unwrap().clone())
        }

        async fn save(&self, email: &str) -> Result<(), RelayError> {
            *self.value.lock().unwrap() = Some(email.to_string());
            Ok(())
        }
    }

    type TestRelay = TranscriptRelay<RecordingSink, MemoryEmailStore, FixedClock>;

    async fn relay(page_email: Option<&str>, store: MemoryEmailStore, sink: RecordingSink) -> TestRelay {
        TranscriptRelay::start(
            Some("s1".to_string()),
            page_email.map(str::to_string),
            "pending@temp.local",
            sink,
            store,
            FixedClock::at("2024-01-01T00:00:00.000Z"),
        )
        .await
    }

    fn user_text(text: &str) -> WidgetEvent {
        WidgetEvent::UserMessage(TextPayload {
            text: Some(text.to_string()),
            id: None,
        })
    }

    fn response(text: &str, id: &str) -> WidgetEvent {
        WidgetEvent::Response(TextPayload {
            text: Some(text.to_string()),
            id: Some(id.to_string()),
        })
    }

    // --- Tests ---

    #[tokio::test]
    async fn known_email_sends_full_history_each_time() {
        let mut relay = relay(Some("a@b.com"), MemoryEmailStore::default(), RecordingSink::default()).await;
        assert!(!relay.needs_email());

        relay.handle(&user_text("hello")).await;
        let outcome = relay.handle(&response("hi!", "r1")).await;
        assert_eq!(
            outcome,
            RelayOutcome::Appended {
                message_id: "r1".to_string(),
                delivered: true
            }
        );

        let sent = relay.sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].message_count(), 1);
        assert_eq!(sent[1].message_count(), 2);
        assert_eq!(sent[1].email.as_deref(), Some("a@b.com"));
        assert_eq!(sent[1].session_id.as_deref(), Some("s1"));
        let last = &sent[1].messages.as_ref().unwrap()[1];
        assert_eq!(last.role, MessageRole::Assistant);
        assert_eq!(last.timestamp, "2024-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn saved_email_skips_prompt() {
        let relay = relay(None, MemoryEmailStore::with("saved@x.io"), RecordingSink::default()).await;
        assert_eq!(relay.user_email(), Some("saved@x.io"));
        assert!(!relay.needs_email());
    }

    #[tokio::test]
    async fn unknown_email_uses_placeholder() {
        let mut relay = relay(None, MemoryEmailStore::default(), RecordingSink::default()).await;
        assert!(relay.needs_email());

        relay.handle(&response("Please share your email", "r1")).await;
        relay.handle(&user_text("no thanks")).await;

        let sent = relay.sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|r| r.email.as_deref() == Some("pending@temp.local")));
        assert!(relay.needs_email());
    }

    #[tokio::test]
    async fn email_capture_bootstraps_and_requests_reload() {
        let mut relay = relay(None, MemoryEmailStore::default(), RecordingSink::default()).await;
        relay.handle(&response("What's your email?", "r1")).await;

        let outcome = relay.handle(&user_text("it is me@site.dev")).await;
        assert!(outcome.reload_requested());
        assert_eq!(
            outcome,
            RelayOutcome::EmailCaptured {
                email: "me@site.dev".to_string(),
                delivered: true
            }
        );
        assert_eq!(relay.user_email(), Some("me@site.dev"));
        assert!(!relay.needs_email());
        assert_eq!(
            relay.email_store.value.lock().unwrap().as_deref(),
            Some("me@site.dev")
        );

        // One POST for the question, one for the bootstrap; the capturing
        // message is not appended or sent a second time.
        assert_eq!(relay.history().len(), 2);
        let sent = relay.sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        let bootstrap = sent.last().unwrap();
        assert_eq!(bootstrap.email.as_deref(), Some("me@site.dev"));
        let messages = bootstrap.messages.as_ref().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "it is me@site.dev");
        assert_eq!(messages[1].role, MessageRole::User);
    }

    #[tokio::test]
    async fn assistant_text_never_captures_email() {
        let mut relay = relay(None, MemoryEmailStore::default(), RecordingSink::default()).await;
        let outcome = relay.handle(&response("write to help@corp.com", "r1")).await;
        assert!(!outcome.reload_requested());
        assert!(relay.needs_email());
    }

    #[tokio::test]
    async fn delivery_failure_still_advances_history() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let mut relay = relay(Some("a@b.com"), MemoryEmailStore::default(), sink).await;

        let first = relay.handle(&user_text("one")).await;
        assert!(matches!(first, RelayOutcome::Appended { delivered: false, .. }));
        relay.handle(&user_text("two")).await;

        assert_eq!(relay.history().len(), 2);
        // Each attempt carried the whole history; nothing was retried.
        let sent = relay.sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].message_count(), 2);
    }

    #[tokio::test]
    async fn overlapping_hooks_duplicate_messages() {
        let mut relay = relay(Some("a@b.com"), MemoryEmailStore::default(), RecordingSink::default()).await;

        relay
            .handle(&WidgetEvent::Message(MessagePayload {
                role: Some("assistant".to_string()),
                text: Some("answer".to_string()),
                ..Default::default()
            }))
            .await;
        relay.handle(&response("answer", "r1")).await;
        relay
            .handle(&WidgetEvent::ThreadEvent(ThreadEventPayload {
                output_text: Some("answer".to_string()),
                ..Default::default()
            }))
            .await;

        let contents: Vec<&str> = relay.history().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["answer", "answer", "answer"]);
    }

    #[tokio::test]
    async fn empty_thread_event_is_ignored() {
        let mut relay = relay(Some("a@b.com"), MemoryEmailStore::default(), RecordingSink::default()).await;
        let outcome = relay
            .handle(&WidgetEvent::ThreadEvent(ThreadEventPayload::default()))
            .await;
        assert_eq!(outcome, RelayOutcome::Ignored);
        assert!(relay.history().is_empty());
        assert!(relay.sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_session_id_is_generated() {
        let relay: TestRelay = TranscriptRelay::start(
            None,
            None,
            "pending@temp.local",
            RecordingSink::default(),
            MemoryEmailStore::default(),
            FixedClock::at("2024-01-01T00:00:00Z"),
        )
        .await;
        assert!(relay.session_id().starts_with("session-1704067200000-"));
    }
}
