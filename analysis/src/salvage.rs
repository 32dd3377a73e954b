//! Pattern-matched recovery of structured data from free-text replies.
//!
//! This is the second tier of the parser: it runs only after strict JSON
//! deserialization of a reply has failed, and whatever it recovers is
//! tagged `Confidence::Salvaged` on the stored record.

use casework_sdk::FaceBox;
use regex::Regex;
use std::sync::OnceLock;

// Covers both the older ABC-1234 format and Mercosul ABC1D23.
fn plate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Z]{3}[-\s]?[0-9][0-9A-Z]?[0-9]{2}").expect("plate pattern"))
}

fn face_box_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[\s*(\d{1,4})\s*,\s*(\d{1,4})\s*,\s*(\d{1,4})\s*,\s*(\d{1,4})\s*\]")
            .expect("face box pattern")
    })
}

fn edge_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(.+?)\s*->\s*([^:\n]+?)\s*(?::\s*(.+?))?\s*$").expect("edge pattern")
    })
}

/// License plates found in free text, separators stripped:
/// "ABC-1234" -> "ABC1234". Order preserved, duplicates dropped.
pub fn extract_plates(text: &str) -> Vec<String> {
    let mut plates = Vec::new();
    for found in plate_regex().find_iter(text) {
        let normalized: String = found
            .as_str()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        if !plates.contains(&normalized) {
            plates.push(normalized);
        }
    }
    plates
}

/// Bracketed `[x, y, w, h]` quadruples found in free text.
pub fn extract_face_boxes(text: &str) -> Vec<FaceBox> {
    face_box_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            Some(FaceBox {
                x: caps[1].parse().ok()?,
                y: caps[2].parse().ok()?,
                width: caps[3].parse().ok()?,
                height: caps[4].parse().ok()?,
            })
        })
        .collect()
}

/// `source -> target: label` lines found in free text.
pub fn extract_edge_lines(text: &str) -> Vec<(String, String, String)> {
    edge_line_regex()
        .captures_iter(text)
        .map(|caps| {
            (
                caps[1].trim().to_string(),
                caps[2].trim().to_string(),
                caps.get(3)
                    .map_or_else(String::new, |label| label.as_str().trim().to_string()),
            )
        })
        .collect()
}
