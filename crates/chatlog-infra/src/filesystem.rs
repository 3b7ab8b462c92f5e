//! Data directory layout and file-backed local storage.
//!
//! The relay's "local storage" is a flat JSON object in
//! `{data_dir}/local_storage.json`, keyed like the browser's storage
//! (`chatUserEmail`).

use std::path::{Path, PathBuf};

use chatlog_core::relay::{EMAIL_STORAGE_KEY, EmailStore};
use chatlog_types::error::RelayError;
use serde_json::{Map, Value};

const LOCAL_STORAGE_FILE: &str = "local_storage.json";

/// Resolve the data directory: `CHATLOG_DATA_DIR`, else `~/.chatlog`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATLOG_DATA_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".chatlog"))
        .unwrap_or_else(|| PathBuf::from(".chatlog"))
}

/// Email storage backed by `local_storage.json`.
pub struct FileEmailStore {
    path: PathBuf,
}

impl FileEmailStore {
    /// Storage file inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(LOCAL_STORAGE_FILE),
        }
    }

    async fn read_all(&self) -> Result<Map<String, Value>, RelayError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(_) | Err(_) => {
                    tracing::warn!(path = %self.path.display(), "Local storage file is corrupt, ignoring");
                    Ok(Map::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(RelayError::Storage(format!(
                "read {}: {e}",
                self.path.display()
            ))),
        }
    }
}

impl EmailStore for FileEmailStore {
    async fn load(&self) -> Result<Option<String>, RelayError> {
        let all = self.read_all().await?;
        Ok(all
            .get(EMAIL_STORAGE_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn save(&self, email: &str) -> Result<(), RelayError> {
        let mut all = self.read_all().await?;
        all.insert(EMAIL_STORAGE_KEY.to_string(), Value::from(email));

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RelayError::Storage(format!("create {}: {e}", parent.display())))?;
        }
        let body = serde_json::to_string_pretty(&Value::Object(all))
            .map_err(|e| RelayError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| RelayError::Storage(format!("write {}: {e}", self.path.display())))
    }
}
