//! Sanity HTTP API request/response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of `GET /data/query/{dataset}`.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    /// `null` when a `[0]` query matches nothing.
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub ms: Option<u64>,
}

/// Body of `POST /data/mutate/{dataset}`.
#[derive(Debug, Serialize)]
pub struct MutateRequest {
    pub mutations: Vec<Mutation>,
}

/// A single mutation, serialized as `{"create": {...}}` or
/// `{"patch": {"id": ..., "set": {...}}}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutation {
    Create(Value),
    Patch(PatchMutation),
}

#[derive(Debug, Serialize)]
pub struct PatchMutation {
    pub id: String,
    pub set: Map<String, Value>,
}

/// Response of `POST /data/mutate/{dataset}?returnIds=true&returnDocuments=true`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResponse {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
pub struct MutationResult {
    pub id: String,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub document: Option<Value>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl ErrorBody {
    /// Best human-readable message in the body, if any.
    pub fn message(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(|e| e.description.clone().or_else(|| e.kind.clone()))
            .or_else(|| self.message.clone())
    }
}
