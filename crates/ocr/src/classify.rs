use formscan_core::{Content, RegionType};
use image::DynamicImage;
use thiserror::Error;

use crate::checkbox::detect_checkbox;
use crate::preprocess::encode_as_png;
use crate::recognizer::{OcrBackend, OcrError, RecognitionParams};
use crate::region::RegionError;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Region(#[from] RegionError),
    #[error(transparent)]
    Ocr(#[from] OcrError),
}

/// Recognize a text or numeric field as one uniform block.
pub fn recognize_text<R: OcrBackend + ?Sized>(
    backend: &R,
    region: &DynamicImage,
) -> Result<Content, OcrError> {
    let png = encode_as_png(region)?;
    let raw = backend.recognize(&png, &RecognitionParams::block())?;
    Ok(Content::from_recognized(&raw))
}

/// Dispatch on the declared region type.
///
/// `region` is only invoked for types that need pixels, so `image` rows and
/// unknown types never crop and never reach the engine. `Ok(None)` means the
/// row contributes no output record.
pub fn classify_region<R, F>(
    backend: &R,
    region_type: &RegionType,
    region: F,
) -> Result<Option<Content>, ClassifyError>
where
    R: OcrBackend + ?Sized,
    F: FnOnce() -> Result<DynamicImage, RegionError>,
{
    let content = match region_type {
        RegionType::Text | RegionType::Num => recognize_text(backend, &region()?)?,
        RegionType::Checkbox => Content::Checkbox(detect_checkbox(backend, &region()?)?),
        RegionType::Image => return Ok(None),
        RegionType::Other(_) => Content::UnrecognizedRegionType,
    };
    Ok(Some(content))
}
