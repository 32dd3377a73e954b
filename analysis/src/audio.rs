use crate::errors::CallerResult;
use casework_sdk::{AnalysisRecord, Confidence, SpeechModel, Transcription};

/// Transcribes audio evidence into a speaker-labeled record.
///
/// The speaker labels come from the transcription layer's rotation
/// heuristic; they are a reading aid, not diarization.
pub struct AudioAnalyzer<'a> {
    speech: &'a dyn SpeechModel,
    language: String,
}

impl<'a> AudioAnalyzer<'a> {
    pub fn new(speech: &'a dyn SpeechModel, language: impl Into<String>) -> Self {
        Self {
            speech,
            language: language.into(),
        }
    }

    pub async fn analyze(
        &self,
        case_id: &str,
        filename: &str,
        audio: Vec<u8>,
    ) -> CallerResult<AnalysisRecord<Transcription>> {
        let transcription = self
            .speech
            .transcribe(audio, filename, &self.language)
            .await?;
        Ok(AnalysisRecord::new(
            case_id,
            filename,
            transcription,
            Confidence::Structured,
        ))
    }
}
