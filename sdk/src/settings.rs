use crate::errors::AnalysisResult;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Storage key for the API configuration record.
pub const SETTINGS_KEY: &str = "api-configuration";

/// Endpoint credentials and model identifiers.
///
/// Saved wholesale on every write; never partially patched. An empty
/// `api_key` with `mock_mode` off makes the gateway factories fail with
/// `AnalysisError::NotConfigured`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfiguration {
    pub api_key: String,
    pub chat_endpoint: String,
    pub chat_model: String,
    pub transcription_endpoint: String,
    pub transcription_model: String,
    /// BCP-47 tag the model is asked to answer in, e.g. "pt-BR".
    pub language: String,
    /// Demo configuration: no external calls, canned replies.
    #[serde(default)]
    pub mock_mode: bool,
}

impl Default for ApiConfiguration {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            chat_endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            transcription_endpoint: "https://api.openai.com/v1/audio/transcriptions".to_string(),
            transcription_model: "whisper-1".to_string(),
            language: "pt-BR".to_string(),
            mock_mode: false,
        }
    }
}

/// Reads and writes the configuration record through an injected store.
pub struct SettingsStore<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Never fails: a missing key, unreadable value, or storage error all
    /// yield the default configuration.
    pub fn read(&self) -> ApiConfiguration {
        let Some(raw) = self.storage.get(SETTINGS_KEY) else {
            return ApiConfiguration::default();
        };
        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!("stored configuration is unreadable, using defaults: {err}");
                ApiConfiguration::default()
            }
        }
    }

    /// Serializes and overwrites the stored record unconditionally.
    pub fn write(&self, config: &ApiConfiguration) -> AnalysisResult<()> {
        let raw = serde_json::to_string(config)?;
        self.storage.set(SETTINGS_KEY, &raw)
    }
}
