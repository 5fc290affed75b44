use image::DynamicImage;

use crate::preprocess::{binarize, encode_as_png};
use crate::recognizer::{OcrBackend, OcrError, RecognitionParams};

/// Glyphs the engine may report for a checkbox mark.
pub const CHECKBOX_WHITELIST: &str = "Xx";

/// Binarize the region and ask the engine for a single `X`/`x` glyph.
/// Checked iff either case appears anywhere in the output.
pub fn detect_checkbox<R: OcrBackend + ?Sized>(
    backend: &R,
    region: &DynamicImage,
) -> Result<bool, OcrError> {
    let binary = DynamicImage::ImageLuma8(binarize(region));
    let png = encode_as_png(&binary)?;
    let detected = backend.recognize(&png, &RecognitionParams::single_char(CHECKBOX_WHITELIST))?;
    Ok(detected.contains('X') || detected.contains('x'))
}
