use crate::error::Result;
use image::{GrayImage, ImageEncoder};
use std::path::Path;

/// Writes a binary mask to disk as an 8-bit greyscale PNG.
pub fn save_mask(path: impl AsRef<Path>, mask: &GrayImage) -> Result<()> {
    let output = std::fs::File::create(path.as_ref())?;
    let encoder = image::codecs::png::PngEncoder::new(output);

    encoder.write_image(
        mask.as_raw(),
        mask.width(),
        mask.height(),
        image::ExtendedColorType::L8,
    )?;

    Ok(())
}
