//! Client for Whisper-compatible transcription endpoints.
//!
//! Speaker labels are a synthetic rotation, not diarization: the tags exist
//! so transcripts read as a dialogue, and a genuine diarization service
//! would replace this labeling wholesale.

use crate::errors::{AnalysisError, AnalysisResult};
use crate::mock::MockSpeechModel;
use crate::settings::ApiConfiguration;
use crate::types::{SpeakerSegment, Transcription};
use reqwest::{
    header::{self, HeaderValue},
    multipart, Client,
};
use tracing::debug;

/// Synthetic labels rotate through this many speakers.
const SPEAKER_ROTATION: usize = 2;
/// A new speaker label starts every this many remote segments.
const SEGMENTS_PER_SPEAKER: usize = 3;
/// Synthetic duration assigned per sentence when the endpoint returns no
/// timing at all.
const SYNTHETIC_SEGMENT_SECONDS: f64 = 5.0;

#[async_trait::async_trait]
pub trait SpeechModel: Send + Sync {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        language: &str,
    ) -> AnalysisResult<Transcription>;
}

pub struct HttpSpeechModel {
    pub endpoint: String,
    pub model_id: String,
    pub client: Client,
}

pub struct HttpSpeechModelOptions {
    pub endpoint: String,
    pub model_id: String,
    pub api_key: String,
}

impl HttpSpeechModel {
    pub fn new(options: HttpSpeechModelOptions) -> AnalysisResult<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth_header_value: HeaderValue = format!("Bearer {}", options.api_key)
            .try_into()
            .map_err(|_| {
                AnalysisError::InvalidInput("API key is not a valid header value".to_string())
            })?;
        auth_header_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_header_value);

        Ok(Self {
            endpoint: options.endpoint,
            model_id: options.model_id,
            client: Client::builder().default_headers(headers).build()?,
        })
    }
}

#[async_trait::async_trait]
impl SpeechModel for HttpSpeechModel {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        language: &str,
    ) -> AnalysisResult<Transcription> {
        let file = multipart::Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new()
            .part("file", file)
            .text("model", self.model_id.clone())
            .text("response_format", "verbose_json")
            .text("language", primary_language(language).to_string())
            .text("timestamp_granularities[]", "segment");

        debug!(endpoint = %self.endpoint, model = %self.model_id, "sending transcription request");
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::StatusCode(
                status,
                response.text().await.unwrap_or_default(),
            ));
        }

        let verbose = response
            .json::<transcription_api::VerboseTranscription>()
            .await?;
        Ok(build_transcription(verbose))
    }
}

/// Mirror of `chat_model_from_config` for the transcription endpoint.
pub fn speech_model_from_config(config: &ApiConfiguration) -> AnalysisResult<Box<dyn SpeechModel>> {
    if config.mock_mode {
        return Ok(Box::new(MockSpeechModel::new()));
    }
    if config.api_key.is_empty() {
        return Err(AnalysisError::NotConfigured);
    }
    Ok(Box::new(HttpSpeechModel::new(HttpSpeechModelOptions {
        endpoint: config.transcription_endpoint.clone(),
        model_id: config.transcription_model.clone(),
        api_key: config.api_key.clone(),
    })?))
}

fn build_transcription(verbose: transcription_api::VerboseTranscription) -> Transcription {
    let segments = match &verbose.segments {
        Some(segments) if !segments.is_empty() => label_remote_segments(segments),
        _ => synthesize_segments(&verbose.text),
    };
    Transcription {
        text: verbose.text,
        segments,
    }
}

fn label_remote_segments(
    segments: &[transcription_api::TranscriptionSegment],
) -> Vec<SpeakerSegment> {
    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| SpeakerSegment {
            speaker: speaker_tag(index / SEGMENTS_PER_SPEAKER),
            start_seconds: segment.start,
            end_seconds: segment.end,
            text: segment.text.trim().to_string(),
        })
        .collect()
}

/// Split the transcript on terminal punctuation and assign alternating
/// speaker tags with synthetic timing. Used when the endpoint returns no
/// segments.
pub fn synthesize_segments(text: &str) -> Vec<SpeakerSegment> {
    split_sentences(text)
        .into_iter()
        .enumerate()
        .map(|(index, sentence)| SpeakerSegment {
            speaker: speaker_tag(index),
            start_seconds: index as f64 * SYNTHETIC_SEGMENT_SECONDS,
            end_seconds: (index + 1) as f64 * SYNTHETIC_SEGMENT_SECONDS,
            text: sentence,
        })
        .collect()
}

fn speaker_tag(rotation: usize) -> String {
    format!("Speaker {}", rotation % SPEAKER_ROTATION + 1)
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }
    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

/// "pt-BR" -> "pt"; the transcription endpoint takes the primary subtag.
fn primary_language(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

mod transcription_api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct VerboseTranscription {
        pub text: String,
        #[serde(default)]
        pub segments: Option<Vec<TranscriptionSegment>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct TranscriptionSegment {
        pub start: f64,
        pub end: f64,
        pub text: String,
    }
}
