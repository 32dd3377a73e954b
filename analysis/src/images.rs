//! Image analysis: OCR/face/plate extraction through the chat gateway, and
//! the local enhancement pipeline applied before an image is submitted.

use crate::errors::CallerResult;
use crate::salvage::{extract_face_boxes, extract_plates};
use casework_sdk::{
    parse_structured, strip_code_fences, AnalysisRecord, ChatModel, ChatRequest, ImageFindings,
    ImagePart, Message, Parsed, Part, TextPart,
};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use tracing::{debug, warn};

const MAX_TOKENS: u32 = 1000;

const SYSTEM_PROMPT: &str = "You are an assistant for criminal-investigation support staff. \
You read evidence photographs carefully and report only what is visible.";

/// Luma below this selects the dark profile.
const DARK_LUMA_THRESHOLD: f64 = 100.0;
/// Luma above this selects the bright profile.
const BRIGHT_LUMA_THRESHOLD: f64 = 180.0;
/// Luma range below this selects the low-contrast profile.
const LOW_CONTRAST_RANGE: u8 = 80;

const JPEG_QUALITY: u8 = 95;
const SHARPEN_CENTER: f32 = 5.0;
const SHARPEN_NEIGHBOR: f32 = -1.0;

/// Extracts OCR text, face boxes, and license plates from evidence images.
pub struct ImageAnalyzer<'a> {
    chat: &'a dyn ChatModel,
    language: String,
}

impl<'a> ImageAnalyzer<'a> {
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
        image_bytes: &[u8],
        mime_type: &str,
    ) -> CallerResult<AnalysisRecord<ImageFindings>> {
        let request = ChatRequest {
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user_parts(vec![
                    Part::Text(TextPart::new(build_prompt(&self.language))),
                    Part::Image(ImagePart::from_bytes(image_bytes, mime_type)),
                ]),
            ],
            max_tokens: MAX_TOKENS,
        };
        let reply = self.chat.complete(request).await?;
        Ok(parse_reply(&reply).into_record(case_id, filename))
    }
}

fn build_prompt(language: &str) -> String {
    format!(
        r#"Perform OCR on this evidence image and describe what it shows.

Output ONLY valid JSON, no markdown, using exactly this schema:
{{
  "ocr_text": "all legible text in the image",
  "faces": [{{ "x": 0, "y": 0, "width": 0, "height": 0 }}],
  "plates": ["license plates, letters and digits only"]
}}

Face boxes are pixel coordinates. Write all text in {language}."#
    )
}

fn parse_reply(reply: &str) -> Parsed<ImageFindings> {
    if let Some(findings) = parse_structured::<ImageFindings>(reply) {
        return Parsed::Structured(findings);
    }
    let body = strip_code_fences(reply);
    if body.is_empty() {
        warn!("image reply had no usable content");
        return Parsed::Defaulted(ImageFindings::default());
    }
    warn!("image reply was not valid JSON, salvaging plates and face boxes");
    Parsed::Salvaged(ImageFindings {
        ocr_text: body.to_string(),
        faces: extract_face_boxes(body),
        plates: extract_plates(body),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterProfile {
    Dark,
    Bright,
    LowContrast,
    Normal,
}

struct Adjustments {
    brightness: f32,
    contrast: f32,
    saturation: f32,
}

impl FilterProfile {
    fn adjustments(self) -> Adjustments {
        match self {
            Self::Dark => Adjustments {
                brightness: 1.30,
                contrast: 1.20,
                saturation: 1.10,
            },
            Self::Bright => Adjustments {
                brightness: 0.85,
                contrast: 1.10,
                saturation: 1.05,
            },
            Self::LowContrast => Adjustments {
                brightness: 1.05,
                contrast: 1.40,
                saturation: 1.15,
            },
            Self::Normal => Adjustments {
                brightness: 1.05,
                contrast: 1.10,
                saturation: 1.05,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaStats {
    pub average: f64,
    pub range: u8,
}

/// Average luma and luma range (max - min) over all pixels, BT.601 weights.
pub fn luma_stats(image: &RgbImage) -> LumaStats {
    let mut sum = 0u64;
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for pixel in image.pixels() {
        let luma = luma_of(pixel);
        sum += u64::from(luma);
        min = min.min(luma);
        max = max.max(luma);
    }
    let count = u64::from(image.width()) * u64::from(image.height());
    LumaStats {
        average: if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        },
        range: max.saturating_sub(min),
    }
}

fn luma_of(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    (0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)).round() as u8
}

/// Bucket order matters: darkness and brightness win over low contrast.
pub fn select_profile(stats: &LumaStats) -> FilterProfile {
    if stats.average < DARK_LUMA_THRESHOLD {
        FilterProfile::Dark
    } else if stats.average > BRIGHT_LUMA_THRESHOLD {
        FilterProfile::Bright
    } else if stats.range < LOW_CONTRAST_RANGE {
        FilterProfile::LowContrast
    } else {
        FilterProfile::Normal
    }
}

fn apply_adjustments(image: &RgbImage, adjustments: &Adjustments) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let mut adjusted = [0.0f32; 3];
        for (slot, &channel) in adjusted.iter_mut().zip(pixel.0.iter()) {
            let value = f32::from(channel) * adjustments.brightness;
            *slot = (value - 128.0) * adjustments.contrast + 128.0;
        }
        let luma = 0.299 * adjusted[0] + 0.587 * adjusted[1] + 0.114 * adjusted[2];
        for (channel, value) in pixel.0.iter_mut().zip(adjusted.iter()) {
            *channel = (luma + (value - luma) * adjustments.saturation)
                .round()
                .clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Fixed 3x3 sharpening convolution per color channel: center 5, the four
/// neighbors -1, corners 0. Borders replicate the edge pixel; output clamps
/// to [0, 255]. A uniform image passes through unchanged.
pub fn sharpen(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let center = image.get_pixel(x, y);
            let neighbors = [
                image.get_pixel(x, y.saturating_sub(1)),
                image.get_pixel(x, (y + 1).min(height - 1)),
                image.get_pixel(x.saturating_sub(1), y),
                image.get_pixel((x + 1).min(width - 1), y),
            ];
            let mut sharpened = [0u8; 3];
            for channel in 0..3 {
                let mut value = SHARPEN_CENTER * f32::from(center.0[channel]);
                for neighbor in &neighbors {
                    value += SHARPEN_NEIGHBOR * f32::from(neighbor.0[channel]);
                }
                sharpened[channel] = value.round().clamp(0.0, 255.0) as u8;
            }
            out.put_pixel(x, y, Rgb(sharpened));
        }
    }
    out
}

/// The enhancement pipeline: luma statistics select one of four filter
/// profiles, the image passes through that profile and a sharpening
/// convolution, and the result is re-encoded as JPEG. Pure function of the
/// input pixels.
pub fn enhance(image_bytes: &[u8]) -> CallerResult<Vec<u8>> {
    let image = image::load_from_memory(image_bytes)?.to_rgb8();
    let stats = luma_stats(&image);
    let profile = select_profile(&stats);
    debug!(
        average = stats.average,
        range = stats.range,
        ?profile,
        "selected enhancement profile"
    );
    let filtered = apply_adjustments(&image, &profile.adjustments());
    let sharpened = sharpen(&filtered);

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode_image(&sharpened)?;
    Ok(out)
}
