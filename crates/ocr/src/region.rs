use formscan_core::Shape;
use image::{DynamicImage, GenericImageView};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("Region {shape} is outside the {image_width}x{image_height} source image")]
    OutOfBounds {
        shape: Shape,
        image_width: u32,
        image_height: u32,
    },
}

/// Crop `shape` out of `source`. The rectangle must be non-empty and lie
/// entirely inside the image; it is never clamped.
pub fn crop_region(source: &DynamicImage, shape: &Shape) -> Result<DynamicImage, RegionError> {
    let (image_width, image_height) = source.dimensions();
    let out_of_bounds = || RegionError::OutOfBounds { shape: *shape, image_width, image_height };

    if shape.x < 0 || shape.y < 0 || shape.width <= 0 || shape.height <= 0 {
        return Err(out_of_bounds());
    }
    let right = shape.right().ok_or_else(out_of_bounds)?;
    let bottom = shape.bottom().ok_or_else(out_of_bounds)?;
    if right > i64::from(image_width) || bottom > i64::from(image_height) {
        return Err(out_of_bounds());
    }

    // All four values are now within 0..=u32::MAX.
    Ok(source.crop_imm(
        shape.x as u32,
        shape.y as u32,
        shape.width as u32,
        shape.height as u32,
    ))
}
