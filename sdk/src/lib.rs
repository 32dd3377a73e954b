mod chat;
mod errors;
mod json_utils;
mod mock;
mod records;
mod settings;
mod storage;
mod transcription;
mod types;
mod types_ext;

pub use chat::{
    chat_model_from_config, ChatModel, ChatRequest, HttpChatModel, HttpChatModelOptions,
};
pub use errors::*;
pub use json_utils::{extract_json_object, parse_structured, strip_code_fences, Parsed};
pub use mock::{MockChatModel, MockSpeechModel};
pub use records::{keys, RecordStore};
pub use settings::{ApiConfiguration, SettingsStore, SETTINGS_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use transcription::{
    speech_model_from_config, synthesize_segments, HttpSpeechModel, HttpSpeechModelOptions,
    SpeechModel,
};
pub use types::*;
