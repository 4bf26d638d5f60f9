use std::path::Path;

use anyhow::Context as _;
use image::RgbImage;

use crate::foundation::error::SynthResult;

pub fn decode_image(path: &Path) -> SynthResult<RgbImage> {
    let dyn_img =
        image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(dyn_img.to_rgb8())
}

pub fn decode_image_bytes(bytes: &[u8]) -> SynthResult<RgbImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgb8())
}

/// Lossless write. Training consumes pixel-exact rasters, so the output
/// format is always PNG regardless of the path extension.
pub fn encode_png(img: &RgbImage, path: &Path) -> SynthResult<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
