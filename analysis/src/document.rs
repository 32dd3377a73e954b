use crate::errors::CallerResult;
use casework_sdk::{
    parse_structured, strip_code_fences, AnalysisRecord, ChatModel, ChatRequest, DocumentSummary,
    Message, Parsed,
};
use tracing::warn;

const MAX_TOKENS: u32 = 1200;

const SYSTEM_PROMPT: &str = "You are an assistant for criminal-investigation support staff. \
You extract facts from occurrence documents and never invent information that is not in the text.";

/// Summarizes occurrence documents into a structured record.
pub struct DocumentAnalyzer<'a> {
    chat: &'a dyn ChatModel,
    language: String,
}

impl<'a> DocumentAnalyzer<'a> {
    pub fn new(chat: &'a dyn ChatModel, language: impl Into<String>) -> Self {
        Self {
            chat,
            language: language.into(),
        }
    }

    pub async fn analyze(
        &self,
        case_id: &str,
        filename: &str,
        text: &str,
    ) -> CallerResult<AnalysisRecord<DocumentSummary>> {
        let request = ChatRequest {
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(build_prompt(&self.language, text)),
            ],
            max_tokens: MAX_TOKENS,
        };
        let reply = self.chat.complete(request).await?;
        Ok(parse_reply(&reply).into_record(case_id, filename))
    }
}

fn build_prompt(language: &str, text: &str) -> String {
    format!(
        r#"Analyze the occurrence document below and summarize it for an investigation case file.

Output ONLY valid JSON, no markdown, using exactly this schema:
{{
  "summary": "narrative summary of the facts",
  "people": ["full names mentioned"],
  "locations": ["addresses and places mentioned"],
  "dates": ["dates mentioned, ISO format when possible"]
}}

Write all text in {language}.

DOCUMENT:
{text}"#
    )
}

fn parse_reply(reply: &str) -> Parsed<DocumentSummary> {
    if let Some(summary) = parse_structured::<DocumentSummary>(reply) {
        return Parsed::Structured(summary);
    }
    let body = strip_code_fences(reply);
    if body.is_empty() {
        warn!("document reply had no usable content");
        return Parsed::Defaulted(DocumentSummary::default());
    }
    warn!("document reply was not valid JSON, keeping the raw text as summary");
    Parsed::Salvaged(DocumentSummary {
        summary: body.to_string(),
        ..Default::default()
    })
}
