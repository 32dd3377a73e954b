mod audio;
mod document;
mod errors;
mod images;
mod links;
mod report;
mod salvage;

pub use audio::AudioAnalyzer;
pub use document::DocumentAnalyzer;
pub use errors::{CallerError, CallerResult};
pub use images::{
    enhance, luma_stats, select_profile, sharpen, FilterProfile, ImageAnalyzer, LumaStats,
};
pub use links::LinkAnalyzer;
pub use report::{ReportBuilder, ReportMaterials, REPORT_FILENAME};
pub use salvage::{extract_edge_lines, extract_face_boxes, extract_plates};
