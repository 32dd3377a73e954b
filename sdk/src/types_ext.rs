use crate::{
    AnalysisRecord, Confidence, ImagePart, Message, Part, SystemMessage, TextPart, UserMessage,
};
use base64::Engine;

impl TextPart {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for TextPart {
    fn from(value: &str) -> Self {
        Self {
            text: value.to_string(),
        }
    }
}

impl From<String> for TextPart {
    fn from(value: String) -> Self {
        Self { text: value }
    }
}

impl ImagePart {
    pub fn new(image_data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            image_data: image_data.into(),
        }
    }

    /// Build an image part from raw bytes, base64-encoding them.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            image_data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self::System(SystemMessage {
            content: vec![Part::Text(TextPart::new(text))],
        })
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::User(UserMessage {
            content: vec![Part::Text(TextPart::new(text))],
        })
    }

    pub fn user_parts(content: Vec<Part>) -> Self {
        Self::User(UserMessage { content })
    }

    /// Concatenated text parts of the message.
    pub fn text_content(&self) -> String {
        let content = match self {
            Self::System(message) => &message.content,
            Self::User(message) => &message.content,
        };
        content
            .iter()
            .filter_map(|part| match part {
                Part::Text(part) => Some(part.text.as_str()),
                Part::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<T> AnalysisRecord<T> {
    pub fn new(
        case_id: impl Into<String>,
        filename: impl Into<String>,
        output: T,
        confidence: Confidence,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            filename: filename.into(),
            output,
            confidence,
            processed_at: chrono::Utc::now(),
        }
    }
}
