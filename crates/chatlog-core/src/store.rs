//! DocumentStore trait definition.
//!
//! The hosted document store is treated as a remote key-document store with
//! three primitives: fetch the first document matching a field predicate,
//! create a document, and set fields on a document by id. The only predicate
//! used is `_type == <type> && sessionId == <id>`; the store enforces no
//! uniqueness on `sessionId`.

use std::fmt;

use chatlog_types::conversation::CONVERSATION_TYPE;
use chatlog_types::error::StoreError;
use chatlog_types::session::CHAT_SESSION_TYPE;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The two document types this system writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Conversation,
    ChatSession,
}

impl DocumentType {
    /// The `_type` value stored on the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Conversation => CONVERSATION_TYPE,
            DocumentType::ChatSession => CHAT_SESSION_TYPE,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document as returned by the store, system fields included.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub body: Map<String, Value>,
}

impl StoredDocument {
    /// Wrap a raw store document. Fails when `_id` is missing.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        let Value::Object(body) = value else {
            return Err(StoreError::Serialization(
                "document is not a JSON object".to_string(),
            ));
        };
        let id = body
            .get("_id")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::Serialization("document has no _id".to_string()))?
            .to_string();
        Ok(Self { id, body })
    }

    /// String field lookup.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(Value::as_str)
    }

    /// Deserialize into a typed document.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(Value::Object(self.body))?)
    }
}

/// A document to create. The store assigns `_id` and writes `_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub doc_type: DocumentType,
    pub fields: Map<String, Value>,
}

impl NewDocument {
    pub fn new(doc_type: DocumentType) -> Self {
        Self {
            doc_type,
            fields: Map::new(),
        }
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Full body as sent to the store, `_type` included.
    pub fn to_value(&self) -> Value {
        let mut body = self.fields.clone();
        body.insert("_type".to_string(), Value::from(self.doc_type.as_str()));
        Value::Object(body)
    }
}

/// A set-fields patch against one document id.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPatch {
    pub id: String,
    pub set: Map<String, Value>,
}

impl DocumentPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            set: Map::new(),
        }
    }

    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set.insert(name.to_string(), value.into());
        self
    }
}

/// Port for the hosted document store.
///
/// Implementations live in chatlog-infra (`SanityClient`,
/// `InMemoryDocumentStore`). Uses native async fn in traits (RPITIT,
/// Rust 2024 edition).
pub trait DocumentStore: Send + Sync {
    /// First document of `doc_type` whose `sessionId` equals `session_id`.
    /// Which one wins when several match is unspecified.
    fn find_by_session(
        &self,
        doc_type: DocumentType,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<StoredDocument>, StoreError>> + Send;

    /// Create a document and return it as stored.
    fn create(
        &self,
        document: NewDocument,
    ) -> impl std::future::Future<Output = Result<StoredDocument, StoreError>> + Send;

    /// Set fields on an existing document.
    fn patch(
        &self,
        patch: DocumentPatch,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_type_names() {
        assert_eq!(DocumentType::Conversation.as_str(), "conversation");
        assert_eq!(DocumentType::ChatSession.to_string(), "chatSession");
    }

    #[test]
    fn stored_document_requires_id() {
        assert!(StoredDocument::from_value(json!({"sessionId": "s1"})).is_err());
        assert!(StoredDocument::from_value(json!("nope")).is_err());

        let doc = StoredDocument::from_value(json!({"_id": "d1", "sessionId": "s1"})).unwrap();
        assert_eq!(doc.id, "d1");
        assert_eq!(doc.str_field("sessionId"), Some("s1"));
        assert_eq!(doc.str_field("missing"), None);
    }

    #[test]
    fn new_document_body_includes_type() {
        let doc = NewDocument::new(DocumentType::ChatSession).field("email", "a@b.com");
        assert_eq!(
            doc.to_value(),
            json!({"_type": "chatSession", "email": "a@b.com"})
        );
    }

    #[test]
    fn patch_builder_collects_fields() {
        let patch = DocumentPatch::new("d1")
            .set("status", "active")
            .set("messages", json!([]));
        assert_eq!(patch.id, "d1");
        assert_eq!(patch.set.len(), 2);
    }
}
