//! Global configuration types for chatlog.
//!
//! `ChatlogConfig` represents the top-level `config.toml`: where the server
//! listens, which document store backs it, and where the relay posts.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.chatlog/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatlogConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which document store implementation backs the upsert service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Hosted Sanity dataset over HTTP.
    #[default]
    Sanity,
    /// Process-local store, lost on exit.
    Memory,
}

/// Document store connection settings.
///
/// The API token is not part of the file; it comes from
/// `SANITY_SERVER_API_TOKEN`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Reads through the CDN can be stale right after a write, which breaks
    /// the existence check, so this stays off for the upsert path.
    #[serde(default)]
    pub use_cdn: bool,
}

fn default_dataset() -> String {
    "production".to_string()
}

fn default_api_version() -> String {
    "2024-01-01".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            project_id: None,
            dataset: default_dataset(),
            api_version: default_api_version(),
            use_cdn: false,
        }
    }
}

/// Relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Where the relay POSTs the session history.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Email sent while the user has not provided one yet.
    #[serde(default = "default_pending_email")]
    pub pending_email: String,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:3000/api/chat/log".to_string()
}

fn default_pending_email() -> String {
    "pending@temp.local".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            pending_email: default_pending_email(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = ChatlogConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.store.backend, StoreBackend::Sanity);
        assert_eq!(config.store.dataset, "production");
        assert!(!config.store.use_cdn);
        assert_eq!(config.relay.pending_email, "pending@temp.local");
    }

    #[test]
    fn test_config_deserialize_empty_uses_defaults() {
        let config: ChatlogConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.store.api_version, "2024-01-01");
        assert!(config.store.project_id.is_none());
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let toml_str = r#"
[server]
port = 8080

[store]
backend = "memory"
project_id = "abc123"
dataset = "staging"

[relay]
endpoint = "https://example.com/api/chat/log"
"#;
        let config: ChatlogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.project_id.as_deref(), Some("abc123"));
        assert_eq!(config.store.dataset, "staging");
        assert_eq!(config.relay.endpoint, "https://example.com/api/chat/log");
        assert_eq!(config.relay.pending_email, "pending@temp.local");
    }
}
