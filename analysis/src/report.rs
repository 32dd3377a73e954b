use crate::errors::CallerResult;
use casework_sdk::{
    strip_code_fences, AnalysisRecord, ChatModel, ChatRequest, Confidence, DocumentSummary,
    ImageFindings, LinkGraph, Message, NarrativeReport, Transcription,
};
use std::fmt::Write;

const MAX_TOKENS: u32 = 3000;

/// Filename slot used for the single per-case report record.
pub const REPORT_FILENAME: &str = "case-report";

const SYSTEM_PROMPT: &str = "You are an assistant for criminal-investigation support staff. \
You write formal investigation reports strictly from the material provided.";

/// Previously stored analysis records a report is assembled from.
#[derive(Debug, Default)]
pub struct ReportMaterials {
    pub documents: Vec<AnalysisRecord<DocumentSummary>>,
    pub images: Vec<AnalysisRecord<ImageFindings>>,
    pub audio: Vec<AnalysisRecord<Transcription>>,
    pub links: Vec<AnalysisRecord<LinkGraph>>,
}

/// Assembles a narrative report from a case's stored analysis records.
pub struct ReportBuilder<'a> {
    chat: &'a dyn ChatModel,
    language: String,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(chat: &'a dyn ChatModel, language: impl Into<String>) -> Self {
        Self {
            chat,
            language: language.into(),
        }
    }

    pub async fn generate(
        &self,
        case_id: &str,
        materials: &ReportMaterials,
    ) -> CallerResult<AnalysisRecord<NarrativeReport>> {
        let request = ChatRequest {
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(build_prompt(&self.language, case_id, materials)),
            ],
            max_tokens: MAX_TOKENS,
        };
        let reply = self.chat.complete(request).await?;
        let body = strip_code_fences(&reply).to_string();
        Ok(AnalysisRecord::new(
            case_id,
            REPORT_FILENAME,
            NarrativeReport { body },
            Confidence::Structured,
        ))
    }
}

fn build_prompt(language: &str, case_id: &str, materials: &ReportMaterials) -> String {
    let mut prompt = format!(
        "Write a formal investigation report in {language} for case {case_id}, \
organized into sections for facts, evidence reviewed, and conclusions. \
Use only the analyzed material below.\n"
    );

    for record in &materials.documents {
        let _ = write!(
            prompt,
            "\nDOCUMENT {}:\n{}\n",
            record.filename, record.output.summary
        );
    }
    for record in &materials.images {
        let _ = write!(
            prompt,
            "\nEVIDENCE PHOTO {} (plates: {}):\n{}\n",
            record.filename,
            record.output.plates.join(", "),
            record.output.ocr_text
        );
    }
    for record in &materials.audio {
        let _ = write!(
            prompt,
            "\nRECORDING {}:\n{}\n",
            record.filename, record.output.text
        );
    }
    for record in &materials.links {
        let _ = write!(prompt, "\nRELATIONSHIPS {}:\n", record.filename);
        for edge in &record.output.edges {
            let _ = writeln!(
                prompt,
                "{} -> {}: {}",
                node_label(&record.output, &edge.source),
                node_label(&record.output, &edge.target),
                edge.label
            );
        }
    }

    prompt
}

fn node_label<'g>(graph: &'g LinkGraph, id: &'g str) -> &'g str {
    graph
        .nodes
        .iter()
        .find(|node| node.id == id)
        .map_or(id, |node| node.label.as_str())
}
