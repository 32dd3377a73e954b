//! Canned responders for the explicit demo configuration (`mock_mode`).
//!
//! Routing is a substring match over the last user message, so each domain
//! caller receives a payload in its own schema without any network call.
//! These are only reachable through the `*_from_config` factories when mock
//! mode is on; transport failures never fall back here.

use crate::chat::{ChatModel, ChatRequest};
use crate::errors::AnalysisResult;
use crate::types::{Message, SpeakerSegment, Transcription};

#[derive(Debug, Default)]
pub struct MockChatModel;

impl MockChatModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ChatModel for MockChatModel {
    async fn complete(&self, request: ChatRequest) -> AnalysisResult<String> {
        let prompt = last_user_text(&request.messages).to_lowercase();
        Ok(canned_reply(&prompt).to_string())
    }
}

fn last_user_text(messages: &[Message]) -> String {
    messages
        .iter()
        .rev()
        .find(|message| matches!(message, Message::User(_)))
        .map(Message::text_content)
        .unwrap_or_default()
}

// Report prompts embed material from the other domains, so their keywords
// are matched first.
fn canned_reply(prompt: &str) -> &'static str {
    if contains_any(prompt, &["relatório", "relatorio", "report"]) {
        REPORT_REPLY
    } else if contains_any(prompt, &["imagem", "image", "ocr"]) {
        IMAGE_REPLY
    } else if contains_any(prompt, &["áudio", "audio", "transcri"]) {
        AUDIO_REPLY
    } else if contains_any(prompt, &["vínculo", "vinculo", "link", "relationship"]) {
        LINKS_REPLY
    } else {
        DOCUMENT_REPLY
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

const DOCUMENT_REPLY: &str = r#"{
  "summary": "Boletim de ocorrência 4521/2024: furto de veículo registrado na madrugada de 12/03. O veículo, um Gol branco, foi levado da Rua das Flores por volta das 03h. Uma testemunha informou ter visto dois indivíduos no local.",
  "people": ["José da Silva", "Maria Oliveira"],
  "locations": ["Rua das Flores, 123 - Centro"],
  "dates": ["2024-03-12"]
}"#;

const IMAGE_REPLY: &str = r#"{
  "ocr_text": "BOLETIM DE OCORRENCIA 4521/2024 - VEICULO GOL BRANCO PLACA ABC1234 AVISTADO NA RUA DAS FLORES",
  "faces": [{ "x": 120, "y": 80, "width": 64, "height": 64 }],
  "plates": ["ABC1234"]
}"#;

const AUDIO_REPLY: &str = r#"{
  "text": "Eu vi o carro saindo da garagem por volta das três horas. Não consegui ver quem dirigia.",
  "segments": [
    { "speaker": "Speaker 1", "start_seconds": 0.0, "end_seconds": 5.0, "text": "Eu vi o carro saindo da garagem por volta das três horas." },
    { "speaker": "Speaker 2", "start_seconds": 5.0, "end_seconds": 10.0, "text": "Não consegui ver quem dirigia." }
  ]
}"#;

const LINKS_REPLY: &str = r#"{
  "nodes": [
    { "id": "n1", "label": "José da Silva", "kind": "person" },
    { "id": "n2", "label": "Gol branco ABC1234", "kind": "vehicle" },
    { "id": "n3", "label": "Rua das Flores", "kind": "location" }
  ],
  "edges": [
    { "source": "n1", "target": "n2", "label": "proprietário" },
    { "source": "n2", "target": "n3", "label": "avistado em" }
  ]
}"#;

const REPORT_REPLY: &str = "RELATÓRIO DE INVESTIGAÇÃO\n\n1. DOS FATOS\nTrata-se de ocorrência de furto de veículo registrada sob o nº 4521/2024. O veículo Gol branco, placa ABC1234, foi subtraído da Rua das Flores na madrugada de 12 de março de 2024.\n\n2. DAS DILIGÊNCIAS\nForam analisados os documentos anexados aos autos, imagens do local e o depoimento gravado da testemunha.\n\n3. CONCLUSÃO\nOs elementos reunidos até o momento indicam autoria ainda não identificada. Recomenda-se a requisição das imagens de câmeras próximas ao local.";

#[derive(Debug, Default)]
pub struct MockSpeechModel;

impl MockSpeechModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl crate::transcription::SpeechModel for MockSpeechModel {
    async fn transcribe(
        &self,
        _audio: Vec<u8>,
        _filename: &str,
        _language: &str,
    ) -> AnalysisResult<Transcription> {
        Ok(Transcription {
            text: "Eu vi o carro saindo da garagem por volta das três horas. Não consegui ver quem dirigia.".to_string(),
            segments: vec![
                SpeakerSegment {
                    speaker: "Speaker 1".to_string(),
                    start_seconds: 0.0,
                    end_seconds: 5.0,
                    text: "Eu vi o carro saindo da garagem por volta das três horas.".to_string(),
                },
                SpeakerSegment {
                    speaker: "Speaker 2".to_string(),
                    start_seconds: 5.0,
                    end_seconds: 10.0,
                    text: "Não consegui ver quem dirigia.".to_string(),
                },
            ],
        })
    }
}
