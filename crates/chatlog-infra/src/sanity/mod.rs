//! Sanity HTTP API document store.
//!
//! Implements `DocumentStore` against a Sanity dataset:
//! - lookup: `GET /v{version}/data/query/{dataset}` with the GROQ query
//!   `*[_type == "<type>" && sessionId == $sessionId][0]`
//! - create / patch: `POST /v{version}/data/mutate/{dataset}`
//!
//! Writes always go to the live API. Reads use the CDN only when
//! `use_cdn` is set, which is unsafe for the upsert path because a CDN read
//! can miss a document created moments earlier.

pub mod types;

use chatlog_core::store::{DocumentPatch, DocumentStore, DocumentType, NewDocument, StoredDocument};
use chatlog_types::config::StoreConfig;
use chatlog_types::error::StoreError;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;

use self::types::{ErrorBody, MutateRequest, MutateResponse, Mutation, PatchMutation, QueryResponse};

/// GROQ query for the first document of a type with a given `sessionId`.
pub fn session_query(doc_type: DocumentType) -> String {
    format!(r#"*[_type == "{}" && sessionId == $sessionId][0]"#, doc_type.as_str())
}

/// Client for one Sanity project dataset.
pub struct SanityClient {
    http: reqwest::Client,
    api_base: String,
    read_base: String,
    dataset: String,
    api_version: String,
    token: Option<SecretString>,
}

impl SanityClient {
    /// Client for `https://{project_id}.api.sanity.io`.
    pub fn new(
        project_id: &str,
        dataset: impl Into<String>,
        api_version: &str,
        token: Option<SecretString>,
        use_cdn: bool,
    ) -> Self {
        let api_base = format!("https://{project_id}.api.sanity.io");
        let read_base = if use_cdn {
            format!("https://{project_id}.apicdn.sanity.io")
        } else {
            api_base.clone()
        };
        let http = reqwest::Client::builder()
            .user_agent(concat!("chatlog/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            http,
            api_base,
            read_base,
            dataset: dataset.into(),
            api_version: api_version.trim_start_matches('v').to_string(),
            token,
        }
    }

    /// Build from store configuration. Fails when `project_id` is unset.
    pub fn from_config(config: &StoreConfig, token: Option<SecretString>) -> Result<Self, StoreError> {
        let project_id = config
            .project_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                StoreError::Connection(
                    "store.project_id is not set (config.toml or SANITY_PROJECT_ID)".to_string(),
                )
            })?;
        Ok(Self::new(
            project_id,
            config.dataset.clone(),
            &config.api_version,
            token,
            config.use_cdn,
        ))
    }

    /// Point reads and writes at another host (proxies, tests).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        self.read_base = base.clone();
        self.api_base = base;
        self
    }

    fn query_url(&self) -> String {
        format!(
            "{}/v{}/data/query/{}",
            self.read_base, self.api_version, self.dataset
        )
    }

    fn mutate_url(&self) -> String {
        format!(
            "{}/v{}/data/mutate/{}",
            self.api_base, self.api_version, self.dataset
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn mutate(&self, mutation: Mutation) -> Result<MutateResponse, StoreError> {
        let body = MutateRequest {
            mutations: vec![mutation],
        };
        let request = self
            .http
            .post(self.mutate_url())
            .query(&[
                ("returnIds", "true"),
                ("returnDocuments", "true"),
                ("visibility", "sync"),
            ])
            .json(&body);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let response = check_status(response).await?;
        let parsed: MutateResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Query(format!("invalid mutate response: {e}")))?;
        debug!(
            transaction_id = parsed.transaction_id.as_deref().unwrap_or(""),
            results = parsed.results.len(),
            "Sanity mutation committed"
        );
        Ok(parsed)
    }
}

/// Turn a non-2xx response into `StoreError::Rejected` with the body's
/// error description.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message())
        .unwrap_or(text);
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl DocumentStore for SanityClient {
    async fn find_by_session(
        &self,
        doc_type: DocumentType,
        session_id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let query = session_query(doc_type);
        let param = serde_json::to_string(session_id)?;
        let request = self
            .http
            .get(self.query_url())
            .query(&[("query", query.as_str()), ("$sessionId", param.as_str())]);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let response = check_status(response).await?;
        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Query(format!("invalid query response: {e}")))?;

        debug!(
            doc_type = %doc_type,
            session_id,
            found = parsed.result.is_some(),
            ms = parsed.ms.unwrap_or(0),
            "Sanity lookup"
        );
        parsed.result.map(StoredDocument::from_value).transpose()
    }

    async fn create(&self, document: NewDocument) -> Result<StoredDocument, StoreError> {
        let body = document.to_value();
        let response = self.mutate(Mutation::Create(body.clone())).await?;
        let result = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Query("create returned no results".to_string()))?;

        match result.document {
            Some(doc) => StoredDocument::from_value(doc),
            None => {
                let Value::Object(mut body) = body else {
                    return Err(StoreError::Serialization("document is not an object".to_string()));
                };
                body.insert("_id".to_string(), Value::from(result.id.clone()));
                Ok(StoredDocument {
                    id: result.id,
                    body,
                })
            }
        }
    }

    async fn patch(&self, patch: DocumentPatch) -> Result<(), StoreError> {
        self.mutate(Mutation::Patch(PatchMutation {
            id: patch.id,
            set: patch.set,
        }))
        .await?;
        Ok(())
    }
}
