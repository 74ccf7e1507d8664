//! Text extraction front end: photo bytes → deduplicated text lines.
//!
//! Recognition engines are injectable; any decode or recognition failure
//! degrades to an empty result instead of propagating, so one bad photo
//! never fails a request or a batch.

pub mod remote;

use std::collections::HashSet;

use image::DynamicImage;
use log::warn;

/// Longest-side bound applied before recognition. Downscaling caps
/// recognition cost and payload size; it is a precision/cost trade, not a
/// correctness requirement.
pub const MAX_LONG_EDGE: u32 = 1280;

/// A text-recognition backend.
pub trait TextRecognizer: Send + Sync {
    fn name(&self) -> &str;
    /// Returns recognized text, or None when the engine fails.
    fn recognize(&self, image: &DynamicImage) -> Option<String>;
}

/// Decode, normalize and recognize, then clean the output into lines:
/// trimmed, blanks dropped, deduplicated case-insensitively preserving
/// first-seen order.
pub fn extract_text_lines(recognizer: &dyn TextRecognizer, bytes: &[u8]) -> Vec<String> {
    let image = match image::load_from_memory(bytes) {
        Ok(image) => image,
        Err(error) => {
            warn!("[Vision] Failed to decode image: {error}");
            return Vec::new();
        }
    };

    let image = normalize_for_recognition(image);

    let text = match recognizer.recognize(&image) {
        Some(text) => text,
        None => {
            warn!("[Vision] Recognition failed via {}", recognizer.name());
            String::new()
        }
    };

    dedupe_lines(&text)
}

/// Uniform RGB, downscaled preserving aspect ratio when the longer side
/// exceeds [`MAX_LONG_EDGE`].
fn normalize_for_recognition(image: DynamicImage) -> DynamicImage {
    let image = DynamicImage::ImageRgb8(image.to_rgb8());
    if image.width().max(image.height()) <= MAX_LONG_EDGE {
        return image;
    }
    image.resize(
        MAX_LONG_EDGE,
        MAX_LONG_EDGE,
        image::imageops::FilterType::CatmullRom,
    )
}

pub(crate) fn dedupe_lines(text: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut lines = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            lines.push(trimmed.to_string());
        }
    }
    lines
}

#[cfg(test)]
#[path = "tests/vision_tests.rs"]
mod tests;
