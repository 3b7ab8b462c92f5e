//! Application state wiring the transcript service to its store.
//!
//! AppState holds the concrete service used by both the CLI and the HTTP
//! server. `TranscriptService` is generic over store and clock; AppState
//! pins it to the configured infra store and the system clock.

use std::path::PathBuf;
use std::sync::Arc;

use chatlog_core::clock::SystemClock;
use chatlog_core::upsert::service::TranscriptService;
use chatlog_infra::config::{load_config, store_token_from_env};
use chatlog_infra::filesystem::resolve_data_dir;
use chatlog_infra::store::ConfiguredStore;
use chatlog_types::config::ChatlogConfig;

pub type ConcreteTranscriptService = TranscriptService<ConfiguredStore, SystemClock>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub transcript_service: Arc<ConcreteTranscriptService>,
}

impl AppState {
    /// Resolve the data directory and load its configuration.
    pub async fn load_config() -> (PathBuf, ChatlogConfig) {
        let data_dir = resolve_data_dir();
        let config = load_config(&data_dir).await;
        (data_dir, config)
    }

    /// Wire the service against the configured store. `force_memory`
    /// overrides the configured backend.
    pub fn init(config: &ChatlogConfig, force_memory: bool) -> anyhow::Result<Self> {
        let store =
            ConfiguredStore::from_config(&config.store, store_token_from_env(), force_memory)?;
        Ok(Self::with_store(store))
    }

    pub fn with_store(store: ConfiguredStore) -> Self {
        Self {
            transcript_service: Arc::new(TranscriptService::new(store, SystemClock)),
        }
    }
}
