use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pixels strictly brighter than this become white, the rest black.
pub const BINARIZE_THRESHOLD: u8 = 128;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Decode the source image once, fully into memory.
pub fn load_image(path: &Path) -> Result<DynamicImage, PreprocessError> {
    image::open(path).map_err(|source| PreprocessError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Single-channel luminance using ITU-R 601-2 weights in 16-bit fixed point,
/// so grey levels match what existing annotated datasets were tuned on.
/// Alpha is dropped, not composited.
pub fn to_luminance(img: &DynamicImage) -> GrayImage {
    let rgb = img.to_rgb8();
    ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let l = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        Luma([l as u8])
    })
}

/// Luminance + fixed threshold. A pixel equal to the threshold maps to black.
pub fn binarize(img: &DynamicImage) -> GrayImage {
    let mut gray = to_luminance(img);
    for p in gray.pixels_mut() {
        p[0] = if p[0] > BINARIZE_THRESHOLD { 255 } else { 0 };
    }
    gray
}

/// PNG has no float channels, so 32-bit float images (HDR, EXR sources) are
/// narrowed to 8-bit RGB(A) first.
pub fn encode_as_png(img: &DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let narrowed = match img {
        DynamicImage::ImageRgb32F(_) => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
        DynamicImage::ImageRgba32F(_) => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
        _ => None,
    };
    let img = narrowed.as_ref().unwrap_or(img);
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}
