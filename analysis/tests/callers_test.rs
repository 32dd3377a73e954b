use casework_analysis::{
    AudioAnalyzer, DocumentAnalyzer, ImageAnalyzer, LinkAnalyzer, ReportBuilder, ReportMaterials,
};
use casework_sdk::{
    AnalysisResult, ChatModel, ChatRequest, Confidence, MockChatModel, MockSpeechModel,
};

/// Replies with a fixed script regardless of the prompt.
struct ScriptedChatModel {
    reply: String,
}

impl ScriptedChatModel {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ChatModel for ScriptedChatModel {
    async fn complete(&self, _request: ChatRequest) -> AnalysisResult<String> {
        Ok(self.reply.clone())
    }
}

#[tokio::test]
async fn structured_image_reply_is_stored_at_full_confidence() {
    let chat = ScriptedChatModel::new(
        r#"```json
{"ocr_text":"PLACA ABC1234","faces":[],"plates":["ABC1234"]}
```"#,
    );
    let analyzer = ImageAnalyzer::new(&chat, "pt-BR");
    let record = analyzer
        .analyze("case-1", "foto.jpg", b"not-a-real-image", "image/jpeg")
        .await
        .unwrap();
    assert_eq!(record.confidence, Confidence::Structured);
    assert_eq!(record.output.plates, vec!["ABC1234".to_string()]);
    assert_eq!(record.case_id, "case-1");
    assert_eq!(record.filename, "foto.jpg");
}

#[tokio::test]
async fn free_text_image_reply_salvages_the_plate() {
    let chat =
        ScriptedChatModel::new("I can see a white car with the plate ABC-1234 parked outside.");
    let analyzer = ImageAnalyzer::new(&chat, "pt-BR");
    let record = analyzer
        .analyze("case-1", "foto.jpg", b"not-a-real-image", "image/jpeg")
        .await
        .unwrap();
    assert_eq!(record.confidence, Confidence::Salvaged);
    assert_eq!(record.output.plates, vec!["ABC1234".to_string()]);
}

#[tokio::test]
async fn empty_image_reply_defaults() {
    let chat = ScriptedChatModel::new("");
    let analyzer = ImageAnalyzer::new(&chat, "pt-BR");
    let record = analyzer
        .analyze("case-1", "foto.jpg", b"not-a-real-image", "image/jpeg")
        .await
        .unwrap();
    assert_eq!(record.confidence, Confidence::Defaulted);
    assert!(record.output.plates.is_empty());
    assert!(record.output.ocr_text.is_empty());
}

#[tokio::test]
async fn document_free_text_reply_becomes_the_summary() {
    let chat = ScriptedChatModel::new("O documento relata um furto de veículo.");
    let analyzer = DocumentAnalyzer::new(&chat, "pt-BR");
    let record = analyzer
        .analyze("case-1", "bo.pdf", "texto do boletim")
        .await
        .unwrap();
    assert_eq!(record.confidence, Confidence::Salvaged);
    assert_eq!(record.output.summary, "O documento relata um furto de veículo.");
}

#[tokio::test]
async fn link_reply_without_graph_content_defaults_empty() {
    let chat = ScriptedChatModel::new("Não há vínculos identificáveis neste material.");
    let analyzer = LinkAnalyzer::new(&chat, "pt-BR");
    let record = analyzer
        .analyze("case-1", "bo.pdf", "texto do boletim")
        .await
        .unwrap();
    assert_eq!(record.confidence, Confidence::Defaulted);
    assert!(record.output.edges.is_empty());
}

#[tokio::test]
async fn mock_gateway_drives_the_image_caller_end_to_end() {
    let chat = MockChatModel::new();
    let analyzer = ImageAnalyzer::new(&chat, "pt-BR");
    let record = analyzer
        .analyze("case-1", "foto.jpg", b"not-a-real-image", "image/jpeg")
        .await
        .unwrap();
    assert_eq!(record.confidence, Confidence::Structured);
    assert_eq!(record.output.plates, vec!["ABC1234".to_string()]);
    assert_eq!(record.output.faces.len(), 1);
}

#[tokio::test]
async fn mock_speech_model_drives_the_audio_caller() {
    let speech = MockSpeechModel::new();
    let analyzer = AudioAnalyzer::new(&speech, "pt-BR");
    let record = analyzer
        .analyze("case-1", "depoimento.wav", vec![0u8; 32])
        .await
        .unwrap();
    assert_eq!(record.output.segments.len(), 2);
    assert_eq!(record.output.segments[0].speaker, "Speaker 1");
}

#[tokio::test]
async fn report_reply_is_used_verbatim_after_fence_stripping() {
    let chat = ScriptedChatModel::new("```\nRELATÓRIO\n\n1. DOS FATOS\n```");
    let builder = ReportBuilder::new(&chat, "pt-BR");
    let record = builder
        .generate("case-1", &ReportMaterials::default())
        .await
        .unwrap();
    assert_eq!(record.output.body, "RELATÓRIO\n\n1. DOS FATOS");
    assert_eq!(record.filename, casework_analysis::REPORT_FILENAME);
}
