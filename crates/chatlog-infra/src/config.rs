//! Configuration loader for chatlog.
//!
//! Reads `config.toml` from the data directory (`~/.chatlog/` in production)
//! and deserializes it into [`ChatlogConfig`]. Falls back to defaults when
//! the file is missing or malformed, then applies environment overrides.

use std::path::Path;

use chatlog_types::config::ChatlogConfig;
use secrecy::SecretString;

/// Env var holding the store's write token.
pub const TOKEN_ENV: &str = "SANITY_SERVER_API_TOKEN";

/// Load configuration from `{data_dir}/config.toml`, then apply process
/// environment overrides.
pub async fn load_config(data_dir: &Path) -> ChatlogConfig {
    let mut config = load_config_file(data_dir).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Load `{data_dir}/config.toml` without environment overrides.
///
/// - Missing file: defaults.
/// - Unreadable or unparseable file: logs a warning, defaults.
pub async fn load_config_file(data_dir: &Path) -> ChatlogConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ChatlogConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ChatlogConfig::default();
        }
    };

    match toml::from_str::<ChatlogConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ChatlogConfig::default()
        }
    }
}

/// Override store settings from `SANITY_PROJECT_ID`, `SANITY_DATASET` and
/// `SANITY_API_VERSION`. Empty values are ignored.
pub fn apply_env_overrides(config: &mut ChatlogConfig, env: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| env(key).filter(|v| !v.is_empty());

    if let Some(project_id) = get("SANITY_PROJECT_ID") {
        config.store.project_id = Some(project_id);
    }
    if let Some(dataset) = get("SANITY_DATASET") {
        config.store.dataset = dataset;
    }
    if let Some(api_version) = get("SANITY_API_VERSION") {
        config.store.api_version = api_version;
    }
}

/// The store write token from the environment, if set.
pub fn store_token_from_env() -> Option<SecretString> {
    std::env::var(TOKEN_ENV)
        .ok()
        .filter(|t| !t.is_empty())
        .map(SecretString::from)
}
