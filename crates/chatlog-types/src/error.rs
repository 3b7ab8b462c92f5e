use thiserror::Error;

/// Message returned for any request missing email, session id, or messages.
pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";

/// Errors from document store operations (used by the trait in chatlog-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Errors from the conversation / legacy session upsert.
#[derive(Debug, Error)]
pub enum UpsertError {
    #[error("{}", MISSING_REQUIRED_FIELDS)]
    MissingFields,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl UpsertError {
    /// True for input validation failures, which never touch the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, UpsertError::MissingFields)
    }
}

/// Errors from the relay's outbound side: delivery and local storage.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("local storage error: {0}")]
    Storage(String),
}
