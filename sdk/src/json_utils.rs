use crate::types::{AnalysisRecord, Confidence};
use serde::de::DeserializeOwned;

/// Outcome of the two-stage response parser. Call sites keep the recovery
/// tier visible instead of silently downgrading.
#[derive(Debug, Clone)]
pub enum Parsed<T> {
    /// Strict deserialization of the reply succeeded.
    Structured(T),
    /// The reply was not valid JSON; pattern matching recovered partial data.
    Salvaged(T),
    /// Nothing could be recovered; a minimal default stands in.
    Defaulted(T),
}

impl<T> Parsed<T> {
    pub fn confidence(&self) -> Confidence {
        match self {
            Self::Structured(_) => Confidence::Structured,
            Self::Salvaged(_) => Confidence::Salvaged,
            Self::Defaulted(_) => Confidence::Defaulted,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Structured(value) | Self::Salvaged(value) | Self::Defaulted(value) => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Structured(value) | Self::Salvaged(value) | Self::Defaulted(value) => value,
        }
    }

    /// Wrap the payload as a stored record, stamping the parse tier.
    pub fn into_record(
        self,
        case_id: impl Into<String>,
        filename: impl Into<String>,
    ) -> AnalysisRecord<T> {
        let confidence = self.confidence();
        AnalysisRecord::new(case_id, filename, self.into_value(), confidence)
    }
}

/// Remove a single wrapping Markdown code fence, with or without a language
/// tag on the opening line.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.split_once('\n') {
        Some((_info, body)) => body,
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// First balanced `{...}` span in the text, string-literal aware.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Strict parse tier: fence-strip, direct parse, then a parse of the first
/// embedded JSON object.
pub fn parse_structured<T: DeserializeOwned>(reply: &str) -> Option<T> {
    let body = strip_code_fences(reply);
    if let Ok(value) = serde_json::from_str(body) {
        return Some(value);
    }
    let object = extract_json_object(body)?;
    serde_json::from_str(object).ok()
}
