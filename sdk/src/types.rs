use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A part of a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    Text(TextPart),
    Image(ImagePart),
}

/// A part of the message that contains text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
}

/// A part of the message that contains an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePart {
    /// The MIME type of the image. E.g. "image/jpeg", "image/png".
    pub mime_type: String,
    /// The base64-encoded image data.
    pub image_data: String,
}

/// A message in the request payload. Only `system` and `user` roles exist;
/// the reply arrives as plain completion text, not as a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System(SystemMessage),
    User(UserMessage),
}

/// Instructions and context for the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemMessage {
    pub content: Vec<Part>,
}

/// Material submitted by the user for analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMessage {
    pub content: Vec<Part>,
}

/// How a domain payload was recovered from the model reply.
///
/// Persisted with every record so consumers can distinguish a strict parse
/// from a pattern-matched recovery or a stand-in default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Structured,
    Salvaged,
    Defaulted,
}

/// A stored analysis result, one per (case, file) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord<T> {
    pub case_id: String,
    pub filename: String,
    pub output: T,
    pub confidence: Confidence,
    pub processed_at: DateTime<Utc>,
}

/// Summary extracted from an occurrence document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub summary: String,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub dates: Vec<String>,
}

/// OCR text plus detected faces and license plates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFindings {
    pub ocr_text: String,
    #[serde(default)]
    pub faces: Vec<FaceBox>,
    #[serde(default)]
    pub plates: Vec<String>,
}

/// Axis-aligned bounding box of a detected face, in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Transcript text with speaker-labeled segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    #[serde(default)]
    pub segments: Vec<SpeakerSegment>,
}

/// One labeled span of a transcript. Labels are synthetic rotation tags,
/// not diarization output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSegment {
    pub speaker: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub text: String,
}

/// Entities and relationships extracted for link analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkGraph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    /// Entity category, e.g. "person", "vehicle", "location".
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// Assembled narrative report for a case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeReport {
    pub body: String,
}
