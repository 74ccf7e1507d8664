use super::*;

use std::io::Cursor;
use std::sync::Mutex;

use image::{DynamicImage, ImageFormat, RgbImage};

/// Recognizer returning a fixed text, recording the image size it saw.
struct FakeRecognizer {
    text: Option<String>,
    seen_dimensions: Mutex<Option<(u32, u32)>>,
}

impl FakeRecognizer {
    fn returning(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            seen_dimensions: Mutex::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            text: None,
            seen_dimensions: Mutex::new(None),
        }
    }

    fn seen(&self) -> Option<(u32, u32)> {
        *self.seen_dimensions.lock().unwrap()
    }
}

impl TextRecognizer for FakeRecognizer {
    fn name(&self) -> &str {
        "fake"
    }

    fn recognize(&self, image: &DynamicImage) -> Option<String> {
        *self.seen_dimensions.lock().unwrap() = Some((image.width(), image.height()));
        self.text.clone()
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_dedupe_lines() {
    let lines = dedupe_lines("  Anchor \n\nBUTTER\nanchor\n500G\n butter ");
    assert_eq!(lines, vec!["Anchor", "BUTTER", "500G"]);
}

#[test]
fn test_dedupe_lines_empty() {
    assert!(dedupe_lines("").is_empty());
    assert!(dedupe_lines("\n  \n\t\n").is_empty());
}

#[test]
fn test_extract_lines_happy_path() {
    let recognizer = FakeRecognizer::returning("ANCHOR\nBUTTER\n$10.50");
    let lines = extract_text_lines(&recognizer, &png_bytes(64, 64));
    assert_eq!(lines, vec!["ANCHOR", "BUTTER", "$10.50"]);
}

#[test]
fn test_undecodable_bytes_yield_empty() {
    let recognizer = FakeRecognizer::returning("should never be used");
    let lines = extract_text_lines(&recognizer, b"definitely not an image");
    assert!(lines.is_empty());
    // Decode failed before the engine ran.
    assert_eq!(recognizer.seen(), None);
}

#[test]
fn test_recognition_failure_yields_empty() {
    let recognizer = FakeRecognizer::failing();
    let lines = extract_text_lines(&recognizer, &png_bytes(64, 64));
    assert!(lines.is_empty());
}

#[test]
fn test_large_image_downscaled_preserving_aspect() {
    let recognizer = FakeRecognizer::returning("x");
    extract_text_lines(&recognizer, &png_bytes(2000, 500));
    assert_eq!(recognizer.seen(), Some((1280, 320)));
}

#[test]
fn test_small_image_left_alone() {
    let recognizer = FakeRecognizer::returning("x");
    extract_text_lines(&recognizer, &png_bytes(800, 600));
    assert_eq!(recognizer.seen(), Some((800, 600)));
}
